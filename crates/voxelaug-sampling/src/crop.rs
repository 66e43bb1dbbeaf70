//! Crop center generation and clipping.
//!
//! Centers are drawn from precomputed index sets (see [`crate::indices`]),
//! unraveled row-major against the label's spatial shape, then clipped so a
//! patch of the requested size placed at the center stays inside the volume.

use voxelaug_array::index::unravel_index;

use crate::error::SamplingError;
use crate::rng::SampleRng;

/// Resolves a requested patch size against the image extent.
///
/// Entries smaller than one fall back to the full image extent on that axis,
/// so a caller can ask for "everything" on selected axes.
pub(crate) fn fall_back_size(
    spatial_size: &[i64],
    image_shape: &[usize],
) -> Result<Vec<usize>, SamplingError> {
    if spatial_size.len() != image_shape.len() {
        return Err(voxelaug_array::ArrayError::dimension_mismatch(format!(
            "spatial size has {} axes but the image has {}",
            spatial_size.len(),
            image_shape.len()
        ))
        .into());
    }
    Ok(spatial_size
        .iter()
        .zip(image_shape.iter())
        .map(|(&s, &d)| if s < 1 { d } else { s as usize })
        .collect())
}

/// Clips crop centers so the requested patch fits inside the label volume.
///
/// Per axis the valid center range is `[patch/2, dim + 1 - ceil(patch/2))`
/// in integer arithmetic, widened by one when it would be empty, and the
/// center is clamped into it. When the patch is larger than the image on
/// some axis, `allow_smaller` decides between failing and shrinking the
/// patch to the image extent (no cropping on that axis).
///
/// The function is idempotent: a corrected center is its own correction.
///
/// # Examples
///
/// ```rust
/// use voxelaug_sampling::correct_crop_centers;
///
/// let centers = correct_crop_centers(&[0, 0], &[4, 4], &[10, 10], false).unwrap();
/// assert_eq!(centers, vec![2, 2]);
/// ```
pub fn correct_crop_centers(
    centers: &[usize],
    spatial_size: &[i64],
    label_spatial_shape: &[usize],
    allow_smaller: bool,
) -> Result<Vec<usize>, SamplingError> {
    if centers.len() != label_spatial_shape.len() {
        return Err(voxelaug_array::ArrayError::dimension_mismatch(format!(
            "got {} centers for {} spatial axes",
            centers.len(),
            label_spatial_shape.len()
        ))
        .into());
    }
    let mut patch = fall_back_size(spatial_size, label_spatial_shape)?;
    if patch
        .iter()
        .zip(label_spatial_shape.iter())
        .any(|(&p, &d)| d < p)
    {
        if !allow_smaller {
            return Err(SamplingError::RoiLargerThanImage {
                roi: patch,
                image: label_spatial_shape.to_vec(),
            });
        }
        patch
            .iter_mut()
            .zip(label_spatial_shape.iter())
            .for_each(|(p, &d)| *p = (*p).min(d));
    }

    let mut valid_centers = Vec::with_capacity(centers.len());
    for ((&c, &p), &d) in centers
        .iter()
        .zip(patch.iter())
        .zip(label_spatial_shape.iter())
    {
        let valid_start = (p / 2) as i64;
        let mut valid_end = d as i64 + 1 - (p as i64 + 1) / 2;
        // an empty range cannot be drawn from
        if valid_start == valid_end {
            valid_end += 1;
        }
        let corrected = (c as i64).clamp(valid_start, valid_end - 1);
        valid_centers.push(corrected as usize);
    }
    Ok(valid_centers)
}

/// Draws class-balanced crop centers from foreground/background index sets.
///
/// Each of the `num_samples` draws picks the foreground set with probability
/// `pos_ratio` and the background set otherwise, draws one flat index
/// uniformly from the chosen set, unravels it against `label_spatial_shape`
/// and clips it with [`correct_crop_centers`].
///
/// Both sets empty is fatal. When exactly one is empty the ratio is forced
/// to the usable side and a warning is emitted — the caller asked for a
/// balance the data cannot provide.
pub fn generate_pos_neg_label_crop_centers<R: SampleRng>(
    spatial_size: &[i64],
    num_samples: usize,
    pos_ratio: f64,
    label_spatial_shape: &[usize],
    fg_indices: &[usize],
    bg_indices: &[usize],
    rng: &mut R,
    allow_smaller: bool,
) -> Result<Vec<Vec<usize>>, SamplingError> {
    if num_samples < 1 {
        return Err(SamplingError::InvalidNumSamples(num_samples));
    }
    if fg_indices.is_empty() && bg_indices.is_empty() {
        return Err(SamplingError::NoSamplingLocation);
    }

    let mut pos_ratio = pos_ratio;
    if fg_indices.is_empty() || bg_indices.is_empty() {
        let forced = if fg_indices.is_empty() { 0.0 } else { 1.0 };
        log::warn!(
            "num foregrounds {}, num backgrounds {}, unable to generate class balanced samples, \
             setting pos_ratio to {}",
            fg_indices.len(),
            bg_indices.len(),
            forced
        );
        pos_ratio = forced;
    }

    let mut centers = Vec::with_capacity(num_samples);
    for _ in 0..num_samples {
        let indices_to_use = if rng.random() < pos_ratio {
            fg_indices
        } else {
            bg_indices
        };
        let flat = indices_to_use[rng.randint(indices_to_use.len())];
        let center = unravel_index(flat, label_spatial_shape);
        centers.push(correct_crop_centers(
            &center,
            spatial_size,
            label_spatial_shape,
            allow_smaller,
        )?);
    }
    Ok(centers)
}

/// Draws crop centers according to per-class ratios.
///
/// `ratios` defaults to uniform over the classes and must match the number
/// of index sets, with non-negative finite entries. Classes without any
/// available index get their ratio zeroed (optionally with a warning); a
/// class is then drawn per sample from the categorical distribution over the
/// remaining ratios, and one of its flat indices uniformly.
pub fn generate_label_classes_crop_centers<R: SampleRng>(
    spatial_size: &[i64],
    num_samples: usize,
    label_spatial_shape: &[usize],
    indices: &[Vec<usize>],
    ratios: Option<&[f64]>,
    rng: &mut R,
    allow_smaller: bool,
    warn: bool,
) -> Result<Vec<Vec<usize>>, SamplingError> {
    if num_samples < 1 {
        return Err(SamplingError::InvalidNumSamples(num_samples));
    }
    let mut ratios = match ratios {
        Some(r) => {
            if r.len() != indices.len() {
                return Err(SamplingError::RatioCountMismatch {
                    ratios: r.len(),
                    classes: indices.len(),
                });
            }
            r.to_vec()
        }
        None => vec![1.0; indices.len()],
    };
    if ratios.iter().any(|&r| r < 0.0 || !r.is_finite()) {
        return Err(SamplingError::InvalidRatios(ratios));
    }

    for (i, class_indices) in indices.iter().enumerate() {
        if class_indices.is_empty() && ratios[i] != 0.0 {
            ratios[i] = 0.0;
            if warn {
                log::warn!(
                    "no available indices of class {} to crop, setting the crop ratio of this class to zero",
                    i
                );
            }
        }
    }

    let mut centers = Vec::with_capacity(num_samples);
    for _ in 0..num_samples {
        let class = rng
            .choice(&ratios)
            .ok_or(SamplingError::NoSamplingLocation)?;
        let indices_to_use = &indices[class];
        let flat = indices_to_use[rng.randint(indices_to_use.len())];
        let center = unravel_index(flat, label_spatial_shape);
        centers.push(correct_crop_centers(
            &center,
            spatial_size,
            label_spatial_shape,
            allow_smaller,
        )?);
    }
    Ok(centers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRng;

    #[test]
    fn test_correct_crop_centers_concrete() -> Result<(), SamplingError> {
        assert_eq!(
            correct_crop_centers(&[0, 0], &[4, 4], &[10, 10], false)?,
            vec![2, 2]
        );
        // a large requested center clamps to the upper side of the valid range
        assert_eq!(
            correct_crop_centers(&[9, 9], &[4, 4], &[10, 10], false)?,
            vec![8, 8]
        );
        Ok(())
    }

    #[test]
    fn test_correct_crop_centers_bounds_and_idempotence() -> Result<(), SamplingError> {
        let shape = [13usize, 7, 16];
        let patch = [5i64, 7, 4];
        for center in [[0usize, 0, 0], [6, 3, 8], [12, 6, 15]] {
            let corrected = correct_crop_centers(&center, &patch, &shape, false)?;
            for ((&c, &p), &d) in corrected.iter().zip(patch.iter()).zip(shape.iter()) {
                assert!(c < d);
                // the patch fits entirely inside the volume
                assert!(c >= (p as usize) / 2);
                assert!(c + (p as usize).div_ceil(2) <= d);
            }
            let again = correct_crop_centers(&corrected, &patch, &shape, false)?;
            assert_eq!(again, corrected);
        }
        Ok(())
    }

    #[test]
    fn test_correct_crop_centers_roi_too_large() {
        let err = correct_crop_centers(&[1, 1], &[5, 5], &[4, 4], false);
        assert!(matches!(
            err,
            Err(SamplingError::RoiLargerThanImage { .. })
        ));
        // allow_smaller shrinks the patch instead
        let ok = correct_crop_centers(&[1, 1], &[5, 5], &[4, 4], true).unwrap();
        assert_eq!(ok, vec![2, 2]);
    }

    #[test]
    fn test_correct_crop_centers_fallback_axis() -> Result<(), SamplingError> {
        // -1 requests the whole extent on the second axis
        let corrected = correct_crop_centers(&[0, 9], &[4, -1], &[10, 10], false)?;
        assert_eq!(corrected, vec![2, 5]);
        Ok(())
    }

    #[test]
    fn test_pos_neg_centers_within_bounds() -> Result<(), SamplingError> {
        let mut rng = SeededRng::seed(3);
        let fg = vec![12usize, 13, 22, 23];
        let bg = vec![0usize, 1, 98, 99];
        let centers = generate_pos_neg_label_crop_centers(
            &[4, 4],
            16,
            0.5,
            &[10, 10],
            &fg,
            &bg,
            &mut rng,
            false,
        )?;
        assert_eq!(centers.len(), 16);
        for c in &centers {
            assert!(c.iter().all(|&x| (2..=8).contains(&x)));
        }
        Ok(())
    }

    #[test]
    fn test_pos_neg_centers_empty_sets() {
        let mut rng = SeededRng::seed(0);
        let err = generate_pos_neg_label_crop_centers(
            &[2, 2],
            1,
            0.5,
            &[10, 10],
            &[],
            &[],
            &mut rng,
            false,
        );
        assert_eq!(err, Err(SamplingError::NoSamplingLocation));

        // one empty set forces the ratio to the usable side
        let centers = generate_pos_neg_label_crop_centers(
            &[2, 2],
            8,
            0.0,
            &[10, 10],
            &[55],
            &[],
            &mut rng,
            false,
        )
        .unwrap();
        assert!(centers.iter().all(|c| c == &vec![5, 5]));
    }

    #[test]
    fn test_pos_neg_centers_num_samples_validation() {
        let mut rng = SeededRng::seed(0);
        let err = generate_pos_neg_label_crop_centers(
            &[2, 2],
            0,
            0.5,
            &[10, 10],
            &[1],
            &[2],
            &mut rng,
            false,
        );
        assert_eq!(err, Err(SamplingError::InvalidNumSamples(0)));
    }

    #[test]
    fn test_class_centers_ratio_validation() {
        let mut rng = SeededRng::seed(0);
        let indices = vec![vec![0usize], vec![1usize]];
        assert_eq!(
            generate_label_classes_crop_centers(
                &[1, 1],
                1,
                &[2, 2],
                &indices,
                Some(&[1.0]),
                &mut rng,
                false,
                true,
            ),
            Err(SamplingError::RatioCountMismatch {
                ratios: 1,
                classes: 2
            })
        );
        assert!(matches!(
            generate_label_classes_crop_centers(
                &[1, 1],
                1,
                &[2, 2],
                &indices,
                Some(&[1.0, -0.5]),
                &mut rng,
                false,
                true,
            ),
            Err(SamplingError::InvalidRatios(_))
        ));
    }

    #[test]
    fn test_class_centers_zero_ratio_for_empty_class() -> Result<(), SamplingError> {
        let mut rng = SeededRng::seed(11);
        // class 1 has no indices and must never be drawn
        let indices = vec![vec![0usize, 3], vec![]];
        let centers = generate_label_classes_crop_centers(
            &[1, 1],
            32,
            &[2, 2],
            &indices,
            None,
            &mut rng,
            false,
            false,
        )?;
        assert_eq!(centers.len(), 32);
        for c in centers {
            assert!(c == vec![0, 0] || c == vec![1, 1]);
        }
        Ok(())
    }

    #[test]
    fn test_class_centers_all_classes_empty() {
        let mut rng = SeededRng::seed(0);
        let indices = vec![vec![], vec![]];
        let err = generate_label_classes_crop_centers(
            &[1, 1],
            1,
            &[2, 2],
            &indices,
            None,
            &mut rng,
            false,
            false,
        );
        assert_eq!(err, Err(SamplingError::NoSamplingLocation));
    }

    #[test]
    fn test_reproducible_per_seed() -> Result<(), SamplingError> {
        let fg = vec![12usize, 13, 22, 23];
        let bg = vec![0usize, 1, 98, 99];
        let mut rng_a = SeededRng::seed(99);
        let mut rng_b = SeededRng::seed(99);
        let a = generate_pos_neg_label_crop_centers(
            &[4, 4],
            8,
            0.7,
            &[10, 10],
            &fg,
            &bg,
            &mut rng_a,
            false,
        )?;
        let b = generate_pos_neg_label_crop_centers(
            &[4, 4],
            8,
            0.7,
            &[10, 10],
            &fg,
            &bg,
            &mut rng_b,
            false,
        )?;
        assert_eq!(a, b);
        Ok(())
    }
}
