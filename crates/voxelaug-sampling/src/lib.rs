#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// foreground bounding box extraction.
pub mod bbox;

/// crop center generation and clipping.
pub mod crop;

/// error types of the sampling kernel.
pub mod error;

/// class-partitioned index set extraction.
pub mod indices;

/// pending lazy-operation checks.
pub mod pending;

/// the explicit random source contract.
pub mod rng;

/// weight-map proportional patch sampling.
pub mod weighted;

pub use bbox::{generate_spatial_bounding_box, is_positive};
pub use crop::{
    correct_crop_centers, generate_label_classes_crop_centers, generate_pos_neg_label_crop_centers,
};
pub use error::SamplingError;
pub use indices::{map_binary_to_indices, map_classes_to_indices};
pub use pending::check_pending_ops;
pub use rng::{SampleRng, SeededRng};
pub use weighted::weighted_patch_samples;
