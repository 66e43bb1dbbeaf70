//! Backend tags, the numeric capability trait and the sealed family union.
//!
//! The sampling and geometry kernels are written once against
//! [`NumericBackend`]; the two concrete families ([`crate::HostArray`] and
//! [`crate::DeviceTensor`]) implement it. Where an API is polymorphic in its
//! *return* family (grid construction), the sealed [`BackendArray`] union is
//! used and the `Backend` tag is matched exactly once per call.

use std::str::FromStr;

use rayon::prelude::*;

use crate::device::Device;
use crate::error::ArrayError;

/// Tag selecting one of the two array families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Plain host-memory arrays, always on CPU.
    HostArray,
    /// Storage-backed tensors carrying a device placement tag.
    Tensor,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::HostArray => write!(f, "host"),
            Backend::Tensor => write!(f, "tensor"),
        }
    }
}

impl FromStr for Backend {
    type Err = ArrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "host" | "numpy" => Ok(Backend::HostArray),
            "tensor" | "torch" => Ok(Backend::Tensor),
            other => Err(ArrayError::UnknownBackend(other.to_string())),
        }
    }
}

/// Capability interface the kernels need from an array family.
///
/// The first axis of every array is the channel axis; the remaining axes are
/// spatial. Values are exposed through a row-major host view, which is what
/// keeps the two families numerically equivalent by construction: the shared
/// elementwise and reduction code in this trait, and the index arithmetic in
/// [`crate::index`], operate on that view for both.
pub trait NumericBackend: Sized {
    /// Element type of the array.
    type Elem: Copy + Send + Sync;

    /// Builds an array of this family from a shape and row-major data.
    ///
    /// Fails when the data length does not match the shape product, or when
    /// the family cannot hold data on the requested device.
    fn from_shape_vec(
        shape: &[usize],
        data: Vec<Self::Elem>,
        device: Device,
    ) -> Result<Self, ArrayError>;

    /// The family tag of this array.
    fn backend(&self) -> Backend;

    /// The device placement tag of this array.
    fn device(&self) -> Device;

    /// The shape of the array, channel axis first.
    fn shape(&self) -> &[usize];

    /// Row-major host view of the values.
    fn as_slice(&self) -> &[Self::Elem];

    /// Number of unresolved lazy operations recorded on this array.
    ///
    /// Sampling consumers check this and warn (or fail, in strict mode) when
    /// it is nonzero, since their results would reflect stale geometry.
    fn pending_ops(&self) -> usize;

    /// Total number of elements.
    fn numel(&self) -> usize {
        self.shape().iter().product()
    }

    /// Size of the leading (channel) axis.
    fn channels(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    /// The spatial extent, i.e. the shape without the channel axis.
    fn spatial_shape(&self) -> &[usize] {
        let shape = self.shape();
        if shape.is_empty() {
            shape
        } else {
            &shape[1..]
        }
    }

    /// Number of voxels per channel.
    fn spatial_numel(&self) -> usize {
        self.spatial_shape().iter().product()
    }

    /// Row-major view of one channel.
    fn channel_slice(&self, c: usize) -> Result<&[Self::Elem], ArrayError> {
        let channels = self.channels();
        if c >= channels {
            return Err(ArrayError::IndexOutOfBounds {
                index: c,
                size: channels,
            });
        }
        let plane = self.spatial_numel();
        Ok(&self.as_slice()[c * plane..(c + 1) * plane])
    }

    /// Elementwise predicate over all values, producing a row-major mask.
    fn compare<F>(&self, pred: F) -> Vec<bool>
    where
        F: Fn(Self::Elem) -> bool + Sync,
    {
        self.as_slice().par_iter().map(|&v| pred(v)).collect()
    }

    /// Logical-OR reduction of `pred` over the listed channels.
    ///
    /// Produces one boolean per spatial position: whether any of the selected
    /// channels satisfies the predicate there.
    fn any_over_channels<F>(&self, channels: &[usize], pred: F) -> Result<Vec<bool>, ArrayError>
    where
        F: Fn(Self::Elem) -> bool + Sync,
    {
        let num_channels = self.channels();
        for &c in channels {
            if c >= num_channels {
                return Err(ArrayError::IndexOutOfBounds {
                    index: c,
                    size: num_channels,
                });
            }
        }
        let plane = self.spatial_numel();
        let data = self.as_slice();
        Ok((0..plane)
            .into_par_iter()
            .map(|j| channels.iter().any(|&c| pred(data[c * plane + j])))
            .collect())
    }

    /// Logical-OR reduction of `pred` over the whole channel axis.
    fn any_axis0<F>(&self, pred: F) -> Result<Vec<bool>, ArrayError>
    where
        F: Fn(Self::Elem) -> bool + Sync,
    {
        let all: Vec<usize> = (0..self.channels()).collect();
        self.any_over_channels(&all, pred)
    }

    /// Round-trip conversion into another family.
    ///
    /// Values are copied bit-for-bit through the host view, so conversion
    /// never loses precision.
    fn convert<B>(&self, device: Device) -> Result<B, ArrayError>
    where
        B: NumericBackend<Elem = Self::Elem>,
    {
        B::from_shape_vec(self.shape(), self.as_slice().to_vec(), device)
    }
}

/// Sealed union of the two array families.
///
/// Used where the output family of an operation is picked at runtime by a
/// [`Backend`] tag; the tag is dispatched by a single `match` per call.
#[derive(Debug, Clone)]
pub enum BackendArray<T> {
    /// Host-array family member.
    Host(crate::HostArray<T>),
    /// Tensor family member.
    Tensor(crate::DeviceTensor<T>),
}

impl<T: Copy + Send + Sync> BackendArray<T> {
    /// Builds an array of the family selected by `backend`.
    pub fn from_shape_vec(
        backend: Backend,
        shape: &[usize],
        data: Vec<T>,
        device: Device,
    ) -> Result<Self, ArrayError> {
        match backend {
            Backend::HostArray => Ok(BackendArray::Host(
                crate::HostArray::from_shape_vec(shape, data, device)?,
            )),
            Backend::Tensor => Ok(BackendArray::Tensor(
                crate::DeviceTensor::from_shape_vec(shape, data, device)?,
            )),
        }
    }

    /// The family tag of the held array.
    pub fn backend(&self) -> Backend {
        match self {
            BackendArray::Host(_) => Backend::HostArray,
            BackendArray::Tensor(_) => Backend::Tensor,
        }
    }

    /// The shape of the held array.
    pub fn shape(&self) -> &[usize] {
        match self {
            BackendArray::Host(a) => a.shape(),
            BackendArray::Tensor(t) => t.shape(),
        }
    }

    /// The device tag of the held array.
    pub fn device(&self) -> Device {
        match self {
            BackendArray::Host(a) => a.device(),
            BackendArray::Tensor(t) => t.device(),
        }
    }

    /// Row-major host view of the held values.
    pub fn as_slice(&self) -> &[T] {
        match self {
            BackendArray::Host(a) => a.as_slice(),
            BackendArray::Tensor(t) => t.as_slice(),
        }
    }

    /// Moves the value into the host family, copying only when necessary.
    pub fn into_host(self) -> Result<crate::HostArray<T>, ArrayError> {
        match self {
            BackendArray::Host(a) => Ok(a),
            BackendArray::Tensor(t) => t.convert(Device::Cpu),
        }
    }
}
