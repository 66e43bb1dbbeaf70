#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// homogeneous affine matrix construction.
pub mod affine;

/// error types of the geometry kernel.
pub mod error;

/// coordinate grid and control grid construction.
pub mod grid;

/// interpolation and padding mode resolution.
pub mod modes;

pub use affine::{
    create_rotate, create_scale, create_shear, create_translate, scale_affine, AffineMatrix,
};
pub use error::GeometryError;
pub use grid::{create_control_grid, create_grid};
pub use modes::{
    resolves_modes, GridSamplePadMode, InterpolateMode, NdimagePadMode, ResolvedInterp,
    ResolvedPad, SplineMode,
};
