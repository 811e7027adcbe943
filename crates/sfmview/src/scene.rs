use sfmview_colmap::{CameraRecord, ImageRecord, PointRecord};
use sfmview_geometry::{CameraIntrinsics, ParamMapping, PoseTransform};

use crate::ViewerConfig;

/// Receives the geometry of a loaded reconstruction.
///
/// Implemented by the renderer. The loader clears previously inserted
/// geometry before inserting a new reconstruction and keeps no reference to
/// the sink afterwards.
pub trait SceneSink {
    /// Remove all the geometry inserted so far.
    fn clear(&mut self);

    /// Insert the point cloud.
    fn insert_points(&mut self, points: &[PointRecord]);

    /// Insert the camera of a registered image.
    fn insert_camera(&mut self, image: &ImageRecord, pose: &PoseTransform);
}

/// Settings of the pose computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseOptions {
    /// Scale of the camera matrices.
    pub display_scale: f64,
    /// Camera parameter layouts.
    pub param_mapping: ParamMapping,
}

impl Default for PoseOptions {
    fn default() -> Self {
        Self {
            display_scale: 0.25,
            param_mapping: ParamMapping::Current,
        }
    }
}

impl From<&ViewerConfig> for PoseOptions {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            display_scale: config.display_scale,
            param_mapping: config.param_mapping,
        }
    }
}

/// A decoded reconstruction of a scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconstruction {
    /// The point cloud.
    pub points: Vec<PointRecord>,
    /// The registered images.
    pub images: Vec<ImageRecord>,
    /// The cameras.
    pub cameras: Vec<CameraRecord>,
}

impl Reconstruction {
    /// Find a camera by id.
    pub fn camera(&self, camera_id: u32) -> Option<&CameraRecord> {
        self.cameras.iter().find(|camera| camera.matches(camera_id))
    }

    /// Intrinsics of the camera of an image.
    ///
    /// Returns `None` when the camera is missing or its model is unknown,
    /// the image is then shown without a frustum.
    pub fn intrinsics_for(
        &self,
        image: &ImageRecord,
        mapping: ParamMapping,
    ) -> Option<CameraIntrinsics> {
        let Some(camera) = self.camera(image.camera_id) else {
            log::warn!("image {} references missing camera {}", image.id, image.camera_id);
            return None;
        };

        match CameraIntrinsics::from_camera(camera, mapping) {
            Ok(intrinsics) => Some(intrinsics),
            Err(err) => {
                log::warn!("image {}: {err}", image.id);
                None
            }
        }
    }

    /// Compute the pose of every image, in image order.
    pub fn poses(&self, options: PoseOptions) -> Vec<PoseTransform> {
        self.images
            .iter()
            .map(|image| {
                let intrinsics = self.intrinsics_for(image, options.param_mapping);
                PoseTransform::from_image(image, intrinsics.as_ref(), options.display_scale)
            })
            .collect()
    }
}
