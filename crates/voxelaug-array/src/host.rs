//! The host-array family: plain `Vec`-backed dense arrays, always on CPU.

use crate::backend::{Backend, NumericBackend};
use crate::device::Device;
use crate::error::ArrayError;
use crate::index::ravel_index;

/// Dense row-major array in host memory.
///
/// `HostArray` is the lightweight family: a shape and a `Vec`. It is the
/// natural home for label volumes, weight maps and anything the sampling
/// kernel indexes on the CPU side.
///
/// # Examples
///
/// ```rust
/// use voxelaug_array::{Device, HostArray, NumericBackend};
///
/// let a = HostArray::from_shape_vec(&[1, 2, 2], vec![0u8, 1, 2, 3], Device::Cpu).unwrap();
/// assert_eq!(a.shape(), &[1, 2, 2]);
/// assert_eq!(a.spatial_shape(), &[2, 2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HostArray<T> {
    data: Vec<T>,
    shape: Vec<usize>,
    pending_ops: usize,
}

impl<T: Copy + Send + Sync> HostArray<T> {
    /// Creates an array filled with a single value.
    pub fn from_shape_val(shape: &[usize], value: T) -> Self {
        let numel = shape.iter().product();
        Self {
            data: vec![value; numel],
            shape: shape.to_vec(),
            pending_ops: 0,
        }
    }

    /// Records `n` unresolved lazy operations on this array.
    ///
    /// Upstream lazy-transform pipelines stamp this before handing data to
    /// the samplers; the samplers warn or fail on nonzero counts.
    pub fn with_pending_ops(mut self, n: usize) -> Self {
        self.pending_ops = n;
        self
    }

    /// Value at the given N-dimensional coordinates, if in bounds.
    pub fn get(&self, coords: &[usize]) -> Option<&T> {
        if coords.len() != self.shape.len() {
            return None;
        }
        if coords.iter().zip(self.shape.iter()).any(|(&c, &d)| c >= d) {
            return None;
        }
        self.data.get(ravel_index(coords, &self.shape))
    }

    /// Consumes the array and returns the underlying vector.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Copy + Send + Sync> NumericBackend for HostArray<T> {
    type Elem = T;

    fn from_shape_vec(shape: &[usize], data: Vec<T>, device: Device) -> Result<Self, ArrayError> {
        if !device.is_cpu() {
            return Err(ArrayError::UnsupportedDevice {
                family: "host-array",
                device,
            });
        }
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(ArrayError::InvalidShape {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            shape: shape.to_vec(),
            pending_ops: 0,
        })
    }

    fn backend(&self) -> Backend {
        Backend::HostArray
    }

    fn device(&self) -> Device {
        Device::Cpu
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn pending_ops(&self) -> usize {
        self.pending_ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_shape_vec_validates() {
        let err = HostArray::from_shape_vec(&[2, 3], vec![0u8; 5], Device::Cpu);
        assert_eq!(
            err,
            Err(ArrayError::InvalidShape {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_rejects_gpu_device() {
        let err = HostArray::from_shape_vec(&[1], vec![0u8], Device::cuda(0));
        assert!(matches!(err, Err(ArrayError::UnsupportedDevice { .. })));
    }

    #[test]
    fn test_get() {
        let a = HostArray::from_shape_vec(&[1, 2, 3], (0u8..6).collect(), Device::Cpu).unwrap();
        assert_eq!(a.get(&[0, 1, 2]), Some(&5));
        assert_eq!(a.get(&[0, 2, 0]), None);
        assert_eq!(a.get(&[0, 1]), None);
    }

    #[test]
    fn test_pending_ops_stamp() {
        let a = HostArray::from_shape_val(&[1, 2], 0.0f32).with_pending_ops(2);
        assert_eq!(a.pending_ops(), 2);
    }
}
