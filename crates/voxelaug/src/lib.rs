#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use voxelaug_array as array;

#[doc(inline)]
pub use voxelaug_geometry as geometry;

#[doc(inline)]
pub use voxelaug_sampling as sampling;
