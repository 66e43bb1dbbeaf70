//! Shared storage for the tensor family.
//!
//! Storage is reference counted so tensor clones are cheap and views can
//! share one buffer across threads. The buffer itself always lives in
//! host-visible memory; the device tag records intended placement for the
//! embedding runtime, which owns actual transfers.

use std::sync::Arc;

use crate::device::Device;

/// Reference-counted buffer with a device placement tag.
///
/// `TensorStorage` is `Send + Sync` when `T` is, allowing tensors to be
/// shared read-only across threads without copying.
#[derive(Debug, Clone)]
pub struct TensorStorage<T> {
    data: Arc<[T]>,
    device: Device,
}

impl<T: Copy> TensorStorage<T> {
    /// Creates storage from a vector, tagging it with `device`.
    pub fn from_vec(data: Vec<T>, device: Device) -> Self {
        Self {
            data: data.into(),
            device,
        }
    }

    /// Returns the storage data as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the number of elements in the storage.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the storage holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the device tag of the storage.
    #[inline]
    pub fn device(&self) -> Device {
        self.device
    }

    /// Copies the storage contents into a fresh vector.
    pub fn to_vec(&self) -> Vec<T> {
        self.data.to_vec()
    }
}
