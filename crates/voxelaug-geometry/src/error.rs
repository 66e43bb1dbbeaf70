use thiserror::Error;

use voxelaug_array::ArrayError;

/// An error type for the geometry kernel.
#[derive(Error, Debug, PartialEq)]
pub enum GeometryError {
    /// Rotation and shear matrices exist for ranks 2 and 3 only.
    #[error("Unsupported spatial rank: {0}, available options are 2 and 3")]
    UnsupportedRank(usize),

    /// A rotation was requested without any angle.
    #[error("radians must be non empty")]
    EmptyRadians,

    /// Spacing entries must be positive finite values, one per axis.
    #[error("grid spacing must be positive and finite per axis, got {0:?}")]
    InvalidSpacing(Vec<f64>),

    /// Two matrices of different ranks cannot be combined.
    #[error("Rank mismatch between affine operands: {left} and {right}")]
    RankMismatch {
        /// Rank of the left operand
        left: usize,
        /// Rank of the right operand
        right: usize,
    },

    /// The interpolation or padding mode is not known to the target backend.
    #[error("Unsupported interpolation or padding mode: {0}")]
    UnsupportedMode(String),

    /// Error from the array layer.
    #[error(transparent)]
    Array(#[from] ArrayError),
}
