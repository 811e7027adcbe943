use glam::DMat3;
use serde::{Deserialize, Serialize};
use sfmview_colmap::camera_models::CameraModelId;
use sfmview_colmap::{CameraRecord, ColmapError};

/// Position of the focal lengths and principal point in the camera parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamIndices {
    /// Index of the horizontal focal length.
    pub fx: usize,
    /// Index of the vertical focal length.
    pub fy: usize,
    /// Index of the principal point x coordinate.
    pub cx: usize,
    /// Index of the principal point y coordinate.
    pub cy: usize,
}

impl ParamIndices {
    /// Single focal length models: `f, cx, cy, ...`.
    pub const SINGLE_FOCAL: Self = Self {
        fx: 0,
        fy: 0,
        cx: 1,
        cy: 2,
    };

    /// Two focal lengths models: `fx, fy, cx, cy, ...`.
    pub const DUAL_FOCAL: Self = Self {
        fx: 0,
        fy: 1,
        cx: 2,
        cy: 3,
    };
}

/// Table assigning a parameter layout to each camera model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamMapping {
    /// Layouts for the pinhole and radial families. Fisheye and FOV models
    /// have no layout and get zero intrinsics.
    #[default]
    Current,
    /// Earlier viewer behaviour: `PINHOLE` has two focal lengths and every
    /// other model is read as single focal.
    Legacy,
}

impl ParamMapping {
    /// Parameter layout of a camera model, if the table maps it.
    pub fn indices(self, model: CameraModelId) -> Option<ParamIndices> {
        match self {
            ParamMapping::Current => match model {
                CameraModelId::SimplePinhole
                | CameraModelId::SimpleRadial
                | CameraModelId::Radial => Some(ParamIndices::SINGLE_FOCAL),
                CameraModelId::Pinhole
                | CameraModelId::OpenCV
                | CameraModelId::OpenCVFisheye
                | CameraModelId::FullOpenCV => Some(ParamIndices::DUAL_FOCAL),
                CameraModelId::FOV
                | CameraModelId::SimpleRadialFisheye
                | CameraModelId::RadialFisheye
                | CameraModelId::ThinPrismFisheye => None,
            },
            ParamMapping::Legacy => match model {
                CameraModelId::Pinhole => Some(ParamIndices::DUAL_FOCAL),
                _ => Some(ParamIndices::SINGLE_FOCAL),
            },
        }
    }
}

/// Pinhole intrinsics of a camera, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    /// Horizontal focal length.
    pub fx: f64,
    /// Vertical focal length.
    pub fy: f64,
    /// Principal point x coordinate.
    pub cx: f64,
    /// Principal point y coordinate.
    pub cy: f64,
    /// Image width.
    pub width: f64,
    /// Image height.
    pub height: f64,
}

impl CameraIntrinsics {
    /// Intrinsics with all parameters set to zero.
    ///
    /// Used for models without a parameter layout; such a camera yields a
    /// degenerate frustum.
    pub fn zero(width: f64, height: f64) -> Self {
        Self {
            fx: 0.0,
            fy: 0.0,
            cx: 0.0,
            cy: 0.0,
            width,
            height,
        }
    }

    /// Read the intrinsics of a camera record.
    ///
    /// # Arguments
    ///
    /// * `camera` - The decoded camera.
    /// * `mapping` - The parameter layout table.
    ///
    /// # Returns
    ///
    /// The intrinsics, zero when the table has no layout for the model, or
    /// [`ColmapError::UnknownCameraModel`] when the model id is not known.
    pub fn from_camera(camera: &CameraRecord, mapping: ParamMapping) -> Result<Self, ColmapError> {
        let model = camera.model()?;
        let (width, height) = (camera.width as f64, camera.height as f64);

        let intrinsics = match mapping.indices(model.id) {
            Some(indices) => Self {
                fx: camera.params[indices.fx],
                fy: camera.params[indices.fy],
                cx: camera.params[indices.cx],
                cy: camera.params[indices.cy],
                width,
                height,
            },
            None => Self::zero(width, height),
        };

        Ok(intrinsics)
    }

    /// Mean of the two focal lengths.
    #[inline]
    pub fn mean_focal(&self) -> f64 {
        (self.fx + self.fy) / 2.0
    }

    /// The camera matrix K.
    pub fn camera_matrix(&self) -> DMat3 {
        DMat3::from_cols_array(&[
            self.fx, 0.0, 0.0, //
            0.0, self.fy, 0.0, //
            self.cx, self.cy, 1.0,
        ])
    }
}
