#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Binary reader and writer for the points3D, images and cameras sections.
pub mod binary;

/// Registry of the known camera models.
pub mod camera_models;

/// Display color adjustment applied to decoded points.
pub mod color;

mod error;
pub use error::ColmapError;

mod types;
pub use types::*;
