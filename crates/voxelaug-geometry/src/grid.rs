//! Coordinate grid and control grid construction.

use num_traits::Float;

use voxelaug_array::{index::strides_for, Backend, BackendArray, Device};

use crate::error::GeometryError;

fn resolve_spacing(
    spatial_size: &[usize],
    spacing: Option<&[f64]>,
) -> Result<Vec<f64>, GeometryError> {
    if spatial_size.is_empty() {
        return Err(voxelaug_array::ArrayError::dimension_mismatch(
            "grid spatial size must not be empty",
        )
        .into());
    }
    let spacing = match spacing {
        Some(s) => s.to_vec(),
        None => vec![1.0; spatial_size.len()],
    };
    if spacing.len() != spatial_size.len() {
        return Err(voxelaug_array::ArrayError::dimension_mismatch(format!(
            "got {} spacing values for {} spatial axes",
            spacing.len(),
            spatial_size.len()
        ))
        .into());
    }
    if spacing.iter().any(|&s| !s.is_finite() || s <= 0.0) {
        return Err(GeometryError::InvalidSpacing(spacing));
    }
    Ok(spacing)
}

/// Computes a dense coordinate mesh over `spatial_size`.
///
/// Per axis the coordinates are linearly spaced, centered at zero, with
/// extent `(d - 1) * spacing`; the axes combine in index ("ij") order. With
/// `homogeneous` an all-ones plane follows the coordinate channels, giving
/// shape `(r + 1, d1, …, dr)`; without it the shape is `(r, d1, …, dr)`.
/// The `backend` tag picks the output family, `device` its placement.
///
/// # Examples
///
/// ```rust
/// use voxelaug_array::{Backend, Device};
/// use voxelaug_geometry::create_grid;
///
/// let grid = create_grid::<f64>(&[2, 2], None, true, Backend::HostArray, Device::Cpu).unwrap();
/// assert_eq!(grid.shape(), &[3, 2, 2]);
/// assert_eq!(
///     grid.as_slice(),
///     &[-0.5, -0.5, 0.5, 0.5, -0.5, 0.5, -0.5, 0.5, 1.0, 1.0, 1.0, 1.0]
/// );
/// ```
pub fn create_grid<T>(
    spatial_size: &[usize],
    spacing: Option<&[f64]>,
    homogeneous: bool,
    backend: Backend,
    device: Device,
) -> Result<BackendArray<T>, GeometryError>
where
    T: Float + Send + Sync,
{
    let spacing = resolve_spacing(spatial_size, spacing)?;
    let rank = spatial_size.len();

    let ranges: Vec<Vec<f64>> = spatial_size
        .iter()
        .zip(spacing.iter())
        .map(|(&d, &s)| {
            let half = (d as f64 - 1.0) / 2.0 * s;
            (0..d).map(|i| -half + i as f64 * s).collect()
        })
        .collect();

    let numel: usize = spatial_size.iter().product();
    let strides = strides_for(spatial_size);
    let channels = if homogeneous { rank + 1 } else { rank };
    let mut data = Vec::with_capacity(channels * numel);
    for (k, range) in ranges.iter().enumerate() {
        for flat in 0..numel {
            let coord = (flat / strides[k]) % spatial_size[k];
            data.push(T::from(range[coord]).unwrap_or_else(T::nan));
        }
    }
    if homogeneous {
        data.extend(std::iter::repeat(T::one()).take(numel));
    }

    let mut shape = Vec::with_capacity(rank + 1);
    shape.push(channels);
    shape.extend_from_slice(spatial_size);
    Ok(BackendArray::from_shape_vec(backend, &shape, data, device)?)
}

/// Computes a control-point mesh for deformable (B-spline) resampling.
///
/// The grid shape is enlarged per axis so control points over-provision the
/// boundary — even extents get `ceil((d-1)/(2s) + 0.5) * 2 + 2` points, odd
/// extents `ceil((d-1)/(2s)) * 2 + 3` — then the mesh is built by
/// [`create_grid`] with the same spacing.
pub fn create_control_grid<T>(
    spatial_shape: &[usize],
    spacing: &[f64],
    homogeneous: bool,
    backend: Backend,
    device: Device,
) -> Result<BackendArray<T>, GeometryError>
where
    T: Float + Send + Sync,
{
    let spacing = resolve_spacing(spatial_shape, Some(spacing))?;
    let grid_shape: Vec<usize> = spatial_shape
        .iter()
        .zip(spacing.iter())
        .map(|(&d, &s)| {
            let d_f = d as f64;
            if d % 2 == 0 {
                (((d_f - 1.0) / (2.0 * s) + 0.5).ceil() * 2.0 + 2.0) as usize
            } else {
                (((d_f - 1.0) / (2.0 * s)).ceil() * 2.0 + 3.0) as usize
            }
        })
        .collect();
    create_grid(&grid_shape, Some(&spacing), homogeneous, backend, device)
}
