#![deny(missing_docs)]
#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use sfmview_colmap as colmap;

#[doc(inline)]
pub use sfmview_fetch as fetch;

#[doc(inline)]
pub use sfmview_geometry as geometry;

mod config;
pub use config::{ViewerConfig, DEFAULT_FULL_BASE_URL, DEFAULT_MINI_BASE_URL};

mod error;
pub use error::ViewerError;

/// Fetch, decode and hand over reconstructions.
pub mod loader;

/// Decoded reconstructions and the renderer interface.
pub mod scene;

pub use loader::{LoadOutcome, SceneLoader};
pub use scene::{PoseOptions, Reconstruction, SceneSink};
