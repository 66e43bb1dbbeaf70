//! Row-major index arithmetic shared by both array families.
//!
//! These are the flat-index primitives the sampling kernel is written
//! against: strides, ravel/unravel, `nonzero`, cumulative sums and a
//! right-biased `searchsorted`. Both families expose their values through a
//! host view, so a single implementation serves the two of them.

/// Computes the strides for a row-major (C-contiguous) layout.
///
/// The rightmost dimension has stride 1 and each dimension's stride is the
/// product of all dimensions to its right.
///
/// # Examples
///
/// ```rust
/// use voxelaug_array::index::strides_for;
///
/// assert_eq!(strides_for(&[2, 3]), vec![3, 1]);
/// assert_eq!(strides_for(&[2, 3, 4]), vec![12, 4, 1]);
/// ```
pub fn strides_for(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// Converts N-dimensional coordinates into a flat row-major index.
///
/// Coordinates must have the same rank as `shape`; out-of-range coordinates
/// produce an index outside the array, the caller is expected to have
/// validated them.
pub fn ravel_index(coords: &[usize], shape: &[usize]) -> usize {
    debug_assert_eq!(coords.len(), shape.len());
    strides_for(shape)
        .iter()
        .zip(coords.iter())
        .fold(0, |acc, (&stride, &c)| acc + stride * c)
}

/// Converts a flat row-major index into N-dimensional coordinates.
///
/// # Examples
///
/// ```rust
/// use voxelaug_array::index::unravel_index;
///
/// assert_eq!(unravel_index(5, &[3, 3]), vec![1, 2]);
/// ```
pub fn unravel_index(flat: usize, shape: &[usize]) -> Vec<usize> {
    let mut coords = vec![0; shape.len()];
    let mut rem = flat;
    for i in (0..shape.len()).rev() {
        coords[i] = rem % shape[i];
        rem /= shape[i];
    }
    coords
}

/// Returns the flat positions of all `true` entries of a mask.
pub fn nonzero(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &m)| if m { Some(i) } else { None })
        .collect()
}

/// Cumulative sum of a value vector.
///
/// NaN values poison the running total from their position onwards, which is
/// what the degenerate-weight fallback of the samplers relies on to detect
/// non-finite weight maps.
pub fn cumsum(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut acc = 0.0;
    for &v in values {
        acc += v;
        out.push(acc);
    }
    out
}

/// Right-biased binary search over a sorted (non-decreasing) vector.
///
/// Returns the first index whose value strictly exceeds `x`, i.e. the
/// insertion point that keeps equal values to the left. Equivalent to
/// `searchsorted(..., side="right")` over a cumulative-sum vector.
pub fn searchsorted_right(sorted: &[f64], x: f64) -> usize {
    sorted.partition_point(|&v| v <= x)
}
