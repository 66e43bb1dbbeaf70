//! Class-partitioned index set extraction.
//!
//! Labels arrive channel-first: one-hot volumes carry one binary channel per
//! class, argmax volumes carry a single channel of class ids. Both mappers
//! flatten the spatial extent row-major and return plain `Vec<usize>` index
//! sets. The sets live in host memory no matter where the input array is
//! tagged, because the random indexing that consumes them happens on the
//! host side.

use num_traits::ToPrimitive;

use voxelaug_array::{index::nonzero, NumericBackend};

use crate::error::SamplingError;
use crate::pending::check_pending_ops;

fn to_f64<T: ToPrimitive>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

fn require_channel_first<B: NumericBackend>(label: &B) -> Result<(), SamplingError> {
    if label.shape().is_empty() || label.channels() == 0 {
        return Err(voxelaug_array::ArrayError::dimension_mismatch(
            "label must be channel-first with at least one channel",
        )
        .into());
    }
    Ok(())
}

/// Computes foreground and background index sets of a label volume.
///
/// One-hot labels (more than one channel) drop the leading background
/// channel, then any nonzero value across the remaining channels marks a
/// voxel as foreground. Background is the complement, optionally restricted
/// to the valid image region `image > image_threshold` when `image` is
/// supplied.
///
/// # Arguments
///
/// * `label` - Channel-first label volume.
/// * `image` - Optional intensity volume restricting the background set.
/// * `image_threshold` - Threshold defining the valid image region.
///
/// # Examples
///
/// ```rust
/// use voxelaug_array::{Device, HostArray, NumericBackend};
/// use voxelaug_sampling::map_binary_to_indices;
///
/// let label = HostArray::from_shape_vec(
///     &[1, 3, 3],
///     vec![0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0],
///     Device::Cpu,
/// )
/// .unwrap();
/// let (fg, bg) = map_binary_to_indices(&label, None, 0.0).unwrap();
/// assert_eq!(fg, vec![1, 2, 3, 5, 6, 7]);
/// assert_eq!(bg, vec![0, 4, 8]);
/// ```
pub fn map_binary_to_indices<B>(
    label: &B,
    image: Option<&B>,
    image_threshold: f64,
) -> Result<(Vec<usize>, Vec<usize>), SamplingError>
where
    B: NumericBackend,
    B::Elem: ToPrimitive,
{
    check_pending_ops(label, "map_binary_to_indices", false)?;
    require_channel_first(label)?;

    let channels = label.channels();
    // one-hot labels: channel 0 is background, skip it for the foreground OR
    let fg_channels: Vec<usize> = if channels > 1 {
        (1..channels).collect()
    } else {
        vec![0]
    };
    let fg_mask = label.any_over_channels(&fg_channels, |v| to_f64(v) != 0.0)?;
    let fg_indices = nonzero(&fg_mask);

    let bg_indices = match image {
        Some(image) => {
            check_pending_ops(image, "map_binary_to_indices", false)?;
            if image.spatial_shape() != label.spatial_shape() {
                return Err(voxelaug_array::ArrayError::dimension_mismatch(format!(
                    "image spatial shape {:?} does not match label spatial shape {:?}",
                    image.spatial_shape(),
                    label.spatial_shape()
                ))
                .into());
            }
            let img_mask = image.any_axis0(|v| to_f64(v) > image_threshold)?;
            let bg_mask: Vec<bool> = img_mask
                .iter()
                .zip(fg_mask.iter())
                .map(|(&img, &fg)| img && !fg)
                .collect();
            nonzero(&bg_mask)
        }
        None => {
            let bg_mask: Vec<bool> = fg_mask.iter().map(|&fg| !fg).collect();
            nonzero(&bg_mask)
        }
    };

    Ok((fg_indices, bg_indices))
}

/// Computes one index set per class of a label volume.
///
/// One-hot labels iterate their channels as classes; argmax labels compare
/// the single channel against each class id and therefore need an explicit
/// `num_classes`. Each set is optionally intersected with the valid image
/// region, and optionally subsampled to `max_samples_per_class` entries at
/// evenly spaced positions — a deterministic reduction, so repeated calls on
/// the same inputs agree.
///
/// # Errors
///
/// Fails with [`SamplingError::MissingNumClasses`] when the label has a
/// single channel and `num_classes` is `None`.
pub fn map_classes_to_indices<B>(
    label: &B,
    num_classes: Option<usize>,
    image: Option<&B>,
    image_threshold: f64,
    max_samples_per_class: Option<usize>,
) -> Result<Vec<Vec<usize>>, SamplingError>
where
    B: NumericBackend,
    B::Elem: ToPrimitive,
{
    check_pending_ops(label, "map_classes_to_indices", false)?;
    require_channel_first(label)?;

    let img_mask = match image {
        Some(image) => {
            check_pending_ops(image, "map_classes_to_indices", false)?;
            if image.spatial_shape() != label.spatial_shape() {
                return Err(voxelaug_array::ArrayError::dimension_mismatch(format!(
                    "image spatial shape {:?} does not match label spatial shape {:?}",
                    image.spatial_shape(),
                    label.spatial_shape()
                ))
                .into());
            }
            Some(image.any_axis0(|v| to_f64(v) > image_threshold)?)
        }
        None => None,
    };

    let channels = label.channels();
    let num_classes = if channels == 1 {
        num_classes.ok_or(SamplingError::MissingNumClasses)?
    } else {
        channels
    };

    let mut indices = Vec::with_capacity(num_classes);
    for c in 0..num_classes {
        let mut class_mask: Vec<bool> = if channels > 1 {
            label
                .channel_slice(c)?
                .iter()
                .map(|&v| to_f64(v) != 0.0)
                .collect()
        } else {
            let class_id = c as f64;
            label
                .channel_slice(0)?
                .iter()
                .map(|&v| to_f64(v) == class_id)
                .collect()
        };
        if let Some(img_mask) = &img_mask {
            class_mask
                .iter_mut()
                .zip(img_mask.iter())
                .for_each(|(m, &img)| *m &= img);
        }
        let class_indices = nonzero(&class_mask);
        indices.push(match max_samples_per_class {
            Some(max) if max >= 1 && class_indices.len() > max && class_indices.len() > 1 => {
                subsample_evenly(&class_indices, max)
            }
            _ => class_indices,
        });
    }

    Ok(indices)
}

/// Picks `n` entries of `indices` at evenly spaced (rounded) positions.
fn subsample_evenly(indices: &[usize], n: usize) -> Vec<usize> {
    if n == 1 {
        return vec![indices[0]];
    }
    let last = (indices.len() - 1) as f64;
    (0..n)
        .map(|i| {
            let pos = (i as f64 * last / (n - 1) as f64).round() as usize;
            indices[pos]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelaug_array::{Device, DeviceTensor, HostArray};

    fn argmax_label() -> HostArray<f64> {
        HostArray::from_shape_vec(
            &[1, 3, 3],
            vec![0.0, 1.0, 2.0, 2.0, 0.0, 1.0, 1.0, 2.0, 0.0],
            Device::Cpu,
        )
        .unwrap()
    }

    #[test]
    fn test_binary_indices_without_image() -> Result<(), SamplingError> {
        let label = HostArray::from_shape_vec(
            &[1, 3, 3],
            vec![0.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0],
            Device::Cpu,
        )?;
        let (fg, bg) = map_binary_to_indices(&label, None, 0.0)?;
        assert_eq!(fg, vec![1, 2, 3, 5, 6, 7]);
        assert_eq!(bg, vec![0, 4, 8]);
        Ok(())
    }

    #[test]
    fn test_binary_indices_one_hot_drops_background_channel() -> Result<(), SamplingError> {
        // channel 0 is background everywhere-true and must be ignored
        let label = HostArray::from_shape_vec(
            &[2, 2, 2],
            vec![1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0],
            Device::Cpu,
        )?;
        let (fg, bg) = map_binary_to_indices(&label, None, 0.0)?;
        assert_eq!(fg, vec![1, 3]);
        assert_eq!(bg, vec![0, 2]);
        Ok(())
    }

    #[test]
    fn test_binary_indices_image_restricts_background() -> Result<(), SamplingError> {
        let label = HostArray::from_shape_vec(
            &[1, 2, 2],
            vec![0.0, 1.0, 0.0, 0.0],
            Device::Cpu,
        )?;
        let image = HostArray::from_shape_vec(
            &[1, 2, 2],
            vec![5.0, 5.0, 0.0, 5.0],
            Device::Cpu,
        )?;
        let (fg, bg) = map_binary_to_indices(&label, Some(&image), 0.0)?;
        assert_eq!(fg, vec![1]);
        // voxel 2 is outside the valid image region
        assert_eq!(bg, vec![0, 3]);
        Ok(())
    }

    #[test]
    fn test_classes_indices_argmax() -> Result<(), SamplingError> {
        let label = HostArray::from_shape_vec(
            &[1, 3, 3],
            vec![0.0, 1.0, 2.0, 2.0, 0.0, 1.0, 1.0, 2.0, 0.0],
            Device::Cpu,
        )?;
        let per_class = map_classes_to_indices(&label, Some(3), None, 0.0, None)?;
        assert_eq!(per_class[0], vec![0, 4, 8]);
        assert_eq!(per_class[1], vec![1, 5, 6]);
        assert_eq!(per_class[2], vec![2, 3, 7]);
        Ok(())
    }

    #[test]
    fn test_classes_indices_one_hot() -> Result<(), SamplingError> {
        let label = HostArray::from_shape_vec(
            &[2, 2, 2],
            vec![1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0],
            Device::Cpu,
        )?;
        let per_class = map_classes_to_indices(&label, None, None, 0.0, None)?;
        assert_eq!(per_class, vec![vec![0, 3], vec![1, 2]]);
        Ok(())
    }

    #[test]
    fn test_classes_indices_requires_num_classes() {
        let label = argmax_label();
        assert_eq!(
            map_classes_to_indices(&label, None, None, 0.0, None),
            Err(SamplingError::MissingNumClasses)
        );
    }

    #[test]
    fn test_classes_indices_subsampling_is_deterministic() -> Result<(), SamplingError> {
        let label = HostArray::from_shape_vec(&[1, 9], vec![1.0; 9], Device::Cpu)?;
        let a = map_classes_to_indices(&label, Some(2), None, 0.0, Some(3))?;
        let b = map_classes_to_indices(&label, Some(2), None, 0.0, Some(3))?;
        assert_eq!(a, b);
        // linspace(0, 8, 3) rounds to positions 0, 4, 8
        assert_eq!(a[1], vec![0, 4, 8]);
        // class 0 has no voxels at all
        assert!(a[0].is_empty());
        Ok(())
    }

    #[test]
    fn test_indices_match_across_families() -> Result<(), SamplingError> {
        let host = argmax_label();
        let tensor: DeviceTensor<f64> = host.convert(Device::Cpu).map_err(SamplingError::from)?;
        let from_host = map_classes_to_indices(&host, Some(3), None, 0.0, None)?;
        let from_tensor = map_classes_to_indices(&tensor, Some(3), None, 0.0, None)?;
        assert_eq!(from_host, from_tensor);
        Ok(())
    }
}
