use crate::camera_models::{self, CameraModelDescriptor};
use crate::ColmapError;

/// Represents a 3D point of the reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    /// Point3d id
    pub id: u64,
    /// x, y, z coordinates
    pub position: [f64; 3],
    /// rgb color as stored in the file
    pub color_raw: [u8; 3],
    /// rgb color after the display enhancement
    pub color: [u8; 3],
    /// Reprojection error. Zero for the mini format.
    pub error: f64,
    /// Number of track entries. The entries themselves are skipped.
    pub track_length: u64,
}

/// Represents a registered image, i.e. a camera pose.
///
/// The pose is world-to-camera: `x_cam = R(qvec) * x_world + tvec`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// Image id
    pub id: u32,
    /// Rotation as quaternion (qw, qx, qy, qz)
    pub qvec: [f64; 4],
    /// Translation (x, y, z)
    pub tvec: [f64; 3],
    /// Id of the camera holding the intrinsics
    pub camera_id: u32,
    /// Image name, usually a relative path.
    ///
    /// Each wire byte maps to the char of the same code point (U+0000 to
    /// U+00FF), so names that are not valid UTF-8 are kept byte for byte.
    pub name: String,
}

/// Represents a camera and its intrinsics.
///
/// NOTE: only the first four parameters are stored on the wire, whatever the
/// number of parameters of the model.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRecord {
    /// Camera id
    pub camera_id: i32,
    /// Camera model id, see [`camera_models::resolve`]
    pub model_id: i32,
    /// Image width
    pub width: u64,
    /// Image height
    pub height: u64,
    /// First four camera parameters
    pub params: [f64; 4],
}

impl CameraRecord {
    /// Resolve the camera model of this camera.
    pub fn model(&self) -> Result<&'static CameraModelDescriptor, ColmapError> {
        camera_models::resolve(self.model_id)
    }

    /// Check whether this camera is the one referenced by an image.
    pub fn matches(&self, camera_id: u32) -> bool {
        i64::from(self.camera_id) == i64::from(camera_id)
    }
}
