//! Homogeneous affine matrix construction.
//!
//! All constructors produce [`AffineMatrix`] values: square `(r+1)×(r+1)`
//! row-major matrices whose last row is `[0, …, 0, 1]`, so translation
//! composes by matrix multiplication. Matrices are family-neutral host
//! values; [`AffineMatrix::into_array`] materialises one into either array
//! family, dispatching the backend tag exactly once.

use voxelaug_array::{Backend, BackendArray, Device};

use crate::error::GeometryError;

/// Square homogeneous transform matrix over `rank` spatial axes.
///
/// The matrix acts on column vectors `(x1, …, xr, 1)`; constructors in this
/// module uphold the invariant that the last row stays `[0, …, 0, 1]`, and
/// [`AffineMatrix::matmul`] preserves it.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineMatrix {
    rank: usize,
    data: Vec<f64>,
}

impl AffineMatrix {
    /// The identity transform over `rank` spatial axes.
    pub fn identity(rank: usize) -> Self {
        let dim = rank + 1;
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        Self { rank, data }
    }

    /// Spatial rank of the transform.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Side length of the matrix, `rank + 1`.
    pub fn dim(&self) -> usize {
        self.rank + 1
    }

    /// Row-major view of the matrix entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Entry at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics when the position is outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.dim() && col < self.dim());
        self.data[row * self.dim() + col]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        let dim = self.dim();
        self.data[row * dim + col] = value;
    }

    /// Matrix product `self · rhs`.
    pub fn matmul(&self, rhs: &AffineMatrix) -> Result<AffineMatrix, GeometryError> {
        if self.rank != rhs.rank {
            return Err(GeometryError::RankMismatch {
                left: self.rank,
                right: rhs.rank,
            });
        }
        let dim = self.dim();
        let mut out = AffineMatrix {
            rank: self.rank,
            data: vec![0.0; dim * dim],
        };
        for r in 0..dim {
            for c in 0..dim {
                let mut acc = 0.0;
                for k in 0..dim {
                    acc += self.data[r * dim + k] * rhs.data[k * dim + c];
                }
                out.data[r * dim + c] = acc;
            }
        }
        Ok(out)
    }

    /// Applies the transform to a spatial point.
    ///
    /// The point is lifted to homogeneous coordinates, multiplied, and
    /// projected back to `rank` components.
    pub fn transform_point(&self, point: &[f64]) -> Result<Vec<f64>, GeometryError> {
        if point.len() != self.rank {
            return Err(GeometryError::RankMismatch {
                left: self.rank,
                right: point.len(),
            });
        }
        let dim = self.dim();
        let mut out = Vec::with_capacity(self.rank);
        for r in 0..self.rank {
            let mut acc = self.data[r * dim + self.rank];
            for (k, &p) in point.iter().enumerate() {
                acc += self.data[r * dim + k] * p;
            }
            out.push(acc);
        }
        Ok(out)
    }

    /// Materialises the matrix into the array family selected by `backend`.
    pub fn into_array(
        &self,
        backend: Backend,
        device: Device,
    ) -> Result<BackendArray<f64>, GeometryError> {
        let dim = self.dim();
        Ok(BackendArray::from_shape_vec(
            backend,
            &[dim, dim],
            self.data.clone(),
            device,
        )?)
    }
}

/// Creates a 2-D or 3-D rotation matrix.
///
/// Rank 2 uses the first angle for the standard in-plane rotation. Rank 3
/// composes one single-axis rotation per supplied angle — about axes 0, 1
/// and 2 in the order the angles appear — by multiplying the homogeneous
/// matrices left to right. Downstream consumers depend on exactly this
/// Euler composition order.
///
/// # Errors
///
/// Fails when `radians` is empty or the rank is not 2 or 3.
///
/// # Examples
///
/// ```rust
/// use voxelaug_geometry::create_rotate;
///
/// let m = create_rotate(2, &[0.0]).unwrap();
/// assert_eq!(m.as_slice(), &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
/// ```
pub fn create_rotate(rank: usize, radians: &[f64]) -> Result<AffineMatrix, GeometryError> {
    match rank {
        2 => {
            let theta = *radians.first().ok_or(GeometryError::EmptyRadians)?;
            let (sin, cos) = theta.sin_cos();
            let mut out = AffineMatrix::identity(2);
            out.set(0, 0, cos);
            out.set(0, 1, -sin);
            out.set(1, 0, sin);
            out.set(1, 1, cos);
            Ok(out)
        }
        3 => {
            if radians.is_empty() {
                return Err(GeometryError::EmptyRadians);
            }
            let mut affine: Option<AffineMatrix> = None;
            if let Some(&theta) = radians.first() {
                let (sin, cos) = theta.sin_cos();
                let mut m = AffineMatrix::identity(3);
                m.set(1, 1, cos);
                m.set(1, 2, -sin);
                m.set(2, 1, sin);
                m.set(2, 2, cos);
                affine = Some(m);
            }
            if let Some(&theta) = radians.get(1) {
                let (sin, cos) = theta.sin_cos();
                let mut m = AffineMatrix::identity(3);
                m.set(0, 0, cos);
                m.set(0, 2, sin);
                m.set(2, 0, -sin);
                m.set(2, 2, cos);
                affine = match affine {
                    Some(a) => Some(a.matmul(&m)?),
                    None => Some(m),
                };
            }
            if let Some(&theta) = radians.get(2) {
                let (sin, cos) = theta.sin_cos();
                let mut m = AffineMatrix::identity(3);
                m.set(0, 0, cos);
                m.set(0, 1, -sin);
                m.set(1, 0, sin);
                m.set(1, 1, cos);
                affine = match affine {
                    Some(a) => Some(a.matmul(&m)?),
                    None => Some(m),
                };
            }
            affine.ok_or(GeometryError::EmptyRadians)
        }
        r => Err(GeometryError::UnsupportedRank(r)),
    }
}

/// Creates a shearing matrix.
///
/// Rank 2 places two coefficients at `(0,1)` and `(1,0)`; rank 3 places six
/// at `(0,1)`, `(0,2)`, `(1,0)`, `(1,2)`, `(2,0)`, `(2,1)` in that order.
/// Missing trailing coefficients default to zero, extra ones are ignored.
pub fn create_shear(rank: usize, coefficients: &[f64]) -> Result<AffineMatrix, GeometryError> {
    let coef = |i: usize| coefficients.get(i).copied().unwrap_or(0.0);
    match rank {
        2 => {
            let mut out = AffineMatrix::identity(2);
            out.set(0, 1, coef(0));
            out.set(1, 0, coef(1));
            Ok(out)
        }
        3 => {
            let mut out = AffineMatrix::identity(3);
            out.set(0, 1, coef(0));
            out.set(0, 2, coef(1));
            out.set(1, 0, coef(2));
            out.set(1, 2, coef(3));
            out.set(2, 0, coef(4));
            out.set(2, 1, coef(5));
            Ok(out)
        }
        r => Err(GeometryError::UnsupportedRank(r)),
    }
}

/// Creates a scaling matrix from up to `rank` factors.
///
/// Missing factors default to 1, extra ones are ignored; the homogeneous
/// diagonal entry stays 1.
pub fn create_scale(rank: usize, factors: &[f64]) -> AffineMatrix {
    let mut out = AffineMatrix::identity(rank);
    for i in 0..rank {
        out.set(i, i, factors.get(i).copied().unwrap_or(1.0));
    }
    out
}

/// Creates a translation matrix from up to `rank` shifts.
///
/// The shifts land in the last column; missing trailing shifts default to
/// zero.
pub fn create_translate(rank: usize, shifts: &[f64]) -> AffineMatrix {
    let mut out = AffineMatrix::identity(rank);
    for (i, &s) in shifts.iter().take(rank).enumerate() {
        out.set(i, rank, s);
    }
    out
}

/// Computes the affine that rescales `old_size` voxel coordinates onto
/// `new_size`.
///
/// Identity when the sizes match. Otherwise the diagonal carries the
/// per-axis ratio `old / max(new, 1)`, and with `centered` the translation
/// column is set to `(scale - 1) / 2` so the scaling pivots about the image
/// center rather than the corner.
pub fn scale_affine(old_size: &[usize], new_size: &[usize], centered: bool) -> AffineMatrix {
    let rank = old_size.len().max(new_size.len());
    if old_size == new_size {
        return AffineMatrix::identity(rank);
    }
    let factors: Vec<f64> = old_size
        .iter()
        .zip(new_size.iter())
        .map(|(&o, &n)| o as f64 / n.max(1) as f64)
        .collect();
    let mut scale = create_scale(rank, &factors);
    if centered {
        for i in 0..rank {
            let s = scale.get(i, i);
            scale.set(i, rank, (s - 1.0) / 2.0);
        }
    }
    scale
}
