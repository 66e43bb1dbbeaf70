use thiserror::Error;

use voxelaug_array::ArrayError;

/// An error type for the sampling kernel.
#[derive(Error, Debug, PartialEq)]
pub enum SamplingError {
    /// Both foreground and background index sets were empty, or every class
    /// ratio collapsed to zero.
    #[error("No sampling location available")]
    NoSamplingLocation,

    /// The requested crop is larger than the image and shrinking was not allowed.
    #[error(
        "The size of the proposed random crop ROI is larger than the image size, \
         got ROI size {roi:?} and label image size {image:?}"
    )]
    RoiLargerThanImage {
        /// Requested region size per spatial axis
        roi: Vec<usize>,
        /// Spatial extent of the label image
        image: Vec<usize>,
    },

    /// The ratio vector length does not match the number of classes.
    #[error("Crop ratios must match the number of class index sets, got {ratios} and {classes}")]
    RatioCountMismatch {
        /// Number of ratio entries supplied
        ratios: usize,
        /// Number of class index sets supplied
        classes: usize,
    },

    /// A ratio entry was negative or not finite.
    #[error("Crop ratios must be non-negative finite numbers, got {0:?}")]
    InvalidRatios(Vec<f64>),

    /// `num_samples` must be at least one.
    #[error("num_samples must be greater than 0, got {0}")]
    InvalidNumSamples(usize),

    /// A single-channel label encodes classes by value and needs an explicit count.
    #[error("channels == 1 indicates an argmax format label, num_classes must be provided")]
    MissingNumClasses,

    /// A bounding-box margin entry was negative.
    #[error("Margin value should not be negative, got {0:?}")]
    NegativeMargin(Vec<i64>),

    /// Strict pending check rejected an input with unresolved lazy operations.
    #[error("The input of {name} has {count} pending operations, its geometry is not final")]
    PendingOperations {
        /// Operation that rejected the input
        name: &'static str,
        /// Number of unresolved operations
        count: usize,
    },

    /// Error from the array layer.
    #[error(transparent)]
    Array(#[from] ArrayError),
}
