#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// backend tags, the capability trait and the family union.
pub mod backend;

/// compute device tags.
pub mod device;

/// error types for array construction and access.
pub mod error;

/// host-memory dense array family.
pub mod host;

/// row-major index arithmetic shared by both families.
pub mod index;

/// storage for the tensor family.
pub mod storage;

/// device-tagged tensor family.
pub mod tensor;

pub use backend::{Backend, BackendArray, NumericBackend};
pub use device::Device;
pub use error::ArrayError;
pub use host::HostArray;
pub use tensor::DeviceTensor;
