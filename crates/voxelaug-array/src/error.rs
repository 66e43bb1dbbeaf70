use thiserror::Error;

use crate::device::Device;

/// An error type for array construction and access.
#[derive(Error, Debug, PartialEq)]
pub enum ArrayError {
    /// Array shape does not match the provided data.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// Index exceeds array bounds.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: usize,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// Array ranks or axis counts incompatible for the requested operation.
    #[error("Dimension mismatch: {message}")]
    DimensionMismatch {
        /// Human-readable description of the mismatch
        message: String,
    },

    /// The array family cannot hold data on the requested device.
    #[error("The {family} family cannot hold data on device {device}")]
    UnsupportedDevice {
        /// Name of the array family
        family: &'static str,
        /// The rejected device tag
        device: Device,
    },

    /// The backend tag could not be parsed.
    #[error("Unknown backend tag: {0}")]
    UnknownBackend(String),
}

impl ArrayError {
    /// Creates a DimensionMismatch error with a formatted message.
    pub fn dimension_mismatch(message: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
        }
    }
}
