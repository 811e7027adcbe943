#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Pinhole intrinsics and the camera parameter layouts.
pub mod intrinsics;

/// World-space camera poses and frustums.
pub mod pose;

/// Quaternion and axis conventions.
pub mod rotation;

pub use intrinsics::{CameraIntrinsics, ParamIndices, ParamMapping};
pub use pose::{Frustum, ImagePlane, PoseTransform, Segment};
