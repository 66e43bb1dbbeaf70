//! Weight-map proportional patch sampling.

use num_traits::ToPrimitive;

use voxelaug_array::{
    index::{cumsum, searchsorted_right, strides_for, unravel_index},
    NumericBackend,
};

use crate::crop::fall_back_size;
use crate::error::SamplingError;
use crate::pending::check_pending_ops;
use crate::rng::SampleRng;

/// Draws patch centers proportional to a spatial weight map.
///
/// Sampling is restricted to the valid interior window per axis —
/// `[patch/2, dim - patch + patch/2)` when the axis is larger than the
/// patch, a single midpoint index otherwise — so every drawn center admits a
/// full patch. The windowed weights are flattened row-major, shifted up by
/// their minimum when any value is negative (inverse-CDF sampling needs
/// non-negative mass), and accumulated. Draws locate positions through a
/// right-biased binary search over the cumulative sum.
///
/// A degenerate weight map — all zeros, or a cumulative total that is zero,
/// negative or not finite — never fails: sampling falls back to uniform over
/// the window, with a warning.
///
/// # Arguments
///
/// * `spatial_size` - Patch extent per axis; entries below one fall back to
///   the full axis.
/// * `weight_map` - Spatial array of sampling weights (no channel axis);
///   zero means "never sampled here".
/// * `n_samples` - Number of centers to draw.
/// * `rng` - Explicit random source.
///
/// # Returns
///
/// `n_samples` full-volume voxel coordinates, one `Vec<usize>` per draw.
pub fn weighted_patch_samples<B, R>(
    spatial_size: &[i64],
    weight_map: &B,
    n_samples: usize,
    rng: &mut R,
) -> Result<Vec<Vec<usize>>, SamplingError>
where
    B: NumericBackend,
    B::Elem: ToPrimitive,
    R: SampleRng,
{
    if n_samples < 1 {
        return Err(SamplingError::InvalidNumSamples(n_samples));
    }
    check_pending_ops(weight_map, "weighted_patch_samples", false)?;

    let img_size = weight_map.shape();
    let win_size = fall_back_size(spatial_size, img_size)?;

    // per-axis valid window: start offset and length
    let mut win_start = Vec::with_capacity(img_size.len());
    let mut win_shape = Vec::with_capacity(img_size.len());
    for (&w, &m) in win_size.iter().zip(img_size.iter()) {
        if m > w {
            win_start.push(w / 2);
            win_shape.push(m - w);
        } else {
            win_start.push(m / 2);
            win_shape.push(1);
        }
    }

    // flatten the windowed weights row-major
    let strides = strides_for(img_size);
    let data = weight_map.as_slice();
    let win_numel: usize = win_shape.iter().product();
    let mut weights = Vec::with_capacity(win_numel);
    for flat in 0..win_numel {
        let coords = unravel_index(flat, &win_shape);
        let full: usize = coords
            .iter()
            .zip(win_start.iter())
            .zip(strides.iter())
            .map(|((&c, &s), &stride)| (c + s) * stride)
            .sum();
        weights.push(data[full].to_f64().unwrap_or(f64::NAN));
    }

    // shift to non-negative, preserving relative ordering
    if weights.iter().any(|&v| v < 0.0) {
        let min = weights.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        weights.iter_mut().for_each(|v| *v -= min);
    }

    let cdf = cumsum(&weights);
    let total = *cdf.last().unwrap_or(&0.0);

    let mut samples = Vec::with_capacity(n_samples);
    if !total.is_finite() || total <= 0.0 {
        log::warn!(
            "weight map has a degenerate cumulative total ({}), falling back to uniform sampling",
            total
        );
        for _ in 0..n_samples {
            samples.push(rng.randint(win_numel));
        }
    } else {
        for _ in 0..n_samples {
            let r = rng.random() * total;
            samples.push(searchsorted_right(&cdf, r));
        }
    }

    Ok(samples
        .into_iter()
        .map(|flat| {
            unravel_index(flat, &win_shape)
                .iter()
                .zip(win_start.iter())
                .map(|(&c, &s)| c + s)
                .collect()
        })
        .collect())
}
