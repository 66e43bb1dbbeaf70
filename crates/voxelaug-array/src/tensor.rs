//! The tensor family: storage-backed arrays carrying a device tag.

use crate::backend::{Backend, NumericBackend};
use crate::device::Device;
use crate::error::ArrayError;
use crate::storage::TensorStorage;

/// Dense array over shared [`TensorStorage`], tagged with a device.
///
/// This is the accelerated-tensor family of the kernel: clones share one
/// reference-counted buffer, and the device tag travels with the value so
/// downstream resamplers can place their work. The numeric surface is
/// identical to [`crate::HostArray`] through [`NumericBackend`].
#[derive(Debug, Clone)]
pub struct DeviceTensor<T> {
    storage: TensorStorage<T>,
    shape: Vec<usize>,
    pending_ops: usize,
}

impl<T: Copy + Send + Sync> DeviceTensor<T> {
    /// Creates a tensor filled with a single value.
    pub fn from_shape_val(shape: &[usize], value: T, device: Device) -> Self {
        let numel = shape.iter().product();
        Self {
            storage: TensorStorage::from_vec(vec![value; numel], device),
            shape: shape.to_vec(),
            pending_ops: 0,
        }
    }

    /// Records `n` unresolved lazy operations on this tensor.
    pub fn with_pending_ops(mut self, n: usize) -> Self {
        self.pending_ops = n;
        self
    }

    /// Moves the values into the host family.
    pub fn to_host(&self) -> Result<crate::HostArray<T>, ArrayError> {
        self.convert(Device::Cpu)
    }

    /// The underlying storage.
    pub fn storage(&self) -> &TensorStorage<T> {
        &self.storage
    }
}

impl<T: Copy + Send + Sync> NumericBackend for DeviceTensor<T> {
    type Elem = T;

    fn from_shape_vec(shape: &[usize], data: Vec<T>, device: Device) -> Result<Self, ArrayError> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(ArrayError::InvalidShape {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            storage: TensorStorage::from_vec(data, device),
            shape: shape.to_vec(),
            pending_ops: 0,
        })
    }

    fn backend(&self) -> Backend {
        Backend::Tensor
    }

    fn device(&self) -> Device {
        self.storage.device()
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    fn pending_ops(&self) -> usize {
        self.pending_ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_storage() {
        let t = DeviceTensor::from_shape_val(&[2, 2], 1.0f32, Device::Cpu);
        let u = t.clone();
        assert_eq!(t.as_slice().as_ptr(), u.as_slice().as_ptr());
    }

    #[test]
    fn test_device_tag_travels() -> Result<(), ArrayError> {
        let t = DeviceTensor::from_shape_vec(&[1, 2], vec![1u8, 2], Device::cuda(1))?;
        assert_eq!(t.device(), Device::cuda(1));
        assert_eq!(t.backend(), Backend::Tensor);
        let host = t.to_host()?;
        assert_eq!(host.device(), Device::Cpu);
        assert_eq!(host.as_slice(), &[1, 2]);
        Ok(())
    }

    #[test]
    fn test_shape_validation() {
        let err = DeviceTensor::from_shape_vec(&[3], vec![0i16; 2], Device::Cpu);
        assert!(matches!(err, Err(ArrayError::InvalidShape { .. })));
    }
}
