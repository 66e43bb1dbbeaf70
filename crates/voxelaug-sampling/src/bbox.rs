//! Foreground bounding box extraction.

use num_traits::ToPrimitive;

use voxelaug_array::NumericBackend;

use crate::error::SamplingError;
use crate::pending::check_pending_ops;

/// Default foreground selector: strictly positive values.
pub fn is_positive<T: ToPrimitive>(v: T) -> bool {
    v.to_f64().map(|x| x > 0.0).unwrap_or(false)
}

/// Computes the minimal axis-aligned bounding box of the foreground.
///
/// `select_fn` marks foreground per element (default callers pass
/// [`is_positive`]); the marks are OR-reduced across the selected channels,
/// and per spatial axis the box spans from the first to one past the last
/// marked position, expanded by `margin`. With `allow_smaller` the box is
/// clipped to the image extent; without it, out-of-range coordinates are
/// returned as-is and are the caller's to handle.
///
/// A volume with no foreground at all yields the all-zero start/end pair —
/// a defined sentinel, not an error.
///
/// # Arguments
///
/// * `img` - Channel-first volume.
/// * `select_fn` - Elementwise foreground predicate.
/// * `channel_indices` - Restrict the predicate to these channels; `None`
///   scans all of them.
/// * `margin` - Per-axis expansion; a single value broadcasts to all axes.
/// * `allow_smaller` - Whether the expanded box may be clipped by the image
///   bounds.
///
/// # Examples
///
/// ```rust
/// use voxelaug_array::{Device, HostArray, NumericBackend};
/// use voxelaug_sampling::{generate_spatial_bounding_box, is_positive};
///
/// let mut data = vec![0.0f64; 36];
/// data[3 * 6 + 4] = 1.0;
/// let img = HostArray::from_shape_vec(&[1, 6, 6], data, Device::Cpu).unwrap();
/// let (start, end) =
///     generate_spatial_bounding_box(&img, is_positive, None, &[0], true).unwrap();
/// assert_eq!(start, vec![3, 4]);
/// assert_eq!(end, vec![4, 5]);
/// ```
pub fn generate_spatial_bounding_box<B, F>(
    img: &B,
    select_fn: F,
    channel_indices: Option<&[usize]>,
    margin: &[i64],
    allow_smaller: bool,
) -> Result<(Vec<i64>, Vec<i64>), SamplingError>
where
    B: NumericBackend,
    F: Fn(B::Elem) -> bool + Sync,
{
    check_pending_ops(img, "generate_spatial_bounding_box", false)?;

    let spatial: Vec<usize> = img.spatial_shape().to_vec();
    let ndim = spatial.len();

    let margin = broadcast_margin(margin, ndim)?;

    let mask = match channel_indices {
        Some(channels) => img.any_over_channels(channels, select_fn)?,
        None => img.any_axis0(select_fn)?,
    };

    // one pass over the mask, tracking per-axis extremes; coordinates are
    // advanced odometer-style to avoid an unravel per voxel
    let mut min_coord = vec![usize::MAX; ndim];
    let mut max_coord = vec![0usize; ndim];
    let mut any_fg = false;
    let mut coords = vec![0usize; ndim];
    for &m in &mask {
        if m {
            any_fg = true;
            for (d, &c) in coords.iter().enumerate() {
                min_coord[d] = min_coord[d].min(c);
                max_coord[d] = max_coord[d].max(c);
            }
        }
        for d in (0..ndim).rev() {
            coords[d] += 1;
            if coords[d] < spatial[d] {
                break;
            }
            coords[d] = 0;
        }
    }

    if !any_fg {
        // no foreground: the defined sentinel result
        return Ok((vec![0; ndim], vec![0; ndim]));
    }

    let mut box_start = Vec::with_capacity(ndim);
    let mut box_end = Vec::with_capacity(ndim);
    for d in 0..ndim {
        let mut start = min_coord[d] as i64 - margin[d];
        let mut end = max_coord[d] as i64 + margin[d] + 1;
        if allow_smaller {
            start = start.max(0);
            end = end.min(spatial[d] as i64);
        }
        box_start.push(start);
        box_end.push(end);
    }
    Ok((box_start, box_end))
}

fn broadcast_margin(margin: &[i64], ndim: usize) -> Result<Vec<i64>, SamplingError> {
    if margin.iter().any(|&m| m < 0) {
        return Err(SamplingError::NegativeMargin(margin.to_vec()));
    }
    match margin.len() {
        1 => Ok(vec![margin[0]; ndim]),
        n if n == ndim => Ok(margin.to_vec()),
        n => Err(voxelaug_array::ArrayError::dimension_mismatch(format!(
            "got {} margin values for {} spatial axes",
            n, ndim
        ))
        .into()),
    }
}
