use crate::ColmapError;

/// Represents a camera model id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum CameraModelId {
    /// Simple pinhole camera model
    SimplePinhole = 0,
    /// Pinhole camera model
    Pinhole = 1,
    /// Simplified radial camera model
    SimpleRadial = 2,
    /// Radial camera model
    Radial = 3,
    /// OpenCV camera model
    OpenCV = 4,
    /// OpenCV fisheye camera model
    OpenCVFisheye = 5,
    /// Full OpenCV camera model
    FullOpenCV = 6,
    /// Field of view camera model
    FOV = 7,
    /// Simple radial fisheye camera model
    SimpleRadialFisheye = 8,
    /// Radial fisheye camera model
    RadialFisheye = 9,
    /// Thin prism fisheye camera model
    ThinPrismFisheye = 10,
}

impl CameraModelId {
    /// Numeric id as stored in the cameras section.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Descriptor of this model in the registry.
    pub fn descriptor(self) -> &'static CameraModelDescriptor {
        // the table is indexed by model id
        &CAMERA_MODELS[self as usize]
    }
}

impl TryFrom<i32> for CameraModelId {
    type Error = ColmapError;

    fn try_from(model_id: i32) -> Result<Self, Self::Error> {
        resolve(model_id).map(|model| model.id)
    }
}

/// Static description of a camera model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraModelDescriptor {
    /// Model id
    pub id: CameraModelId,
    /// Symbolic name, e.g. `SIMPLE_RADIAL`
    pub name: &'static str,
    /// Number of parameters of the full model
    pub num_params: usize,
}

impl CameraModelDescriptor {
    /// Numeric model id.
    pub fn model_id(&self) -> i32 {
        self.id.as_i32()
    }
}

/// The known camera models, indexed by model id.
pub static CAMERA_MODELS: [CameraModelDescriptor; 11] = [
    CameraModelDescriptor {
        id: CameraModelId::SimplePinhole,
        name: "SIMPLE_PINHOLE",
        num_params: 3,
    },
    CameraModelDescriptor {
        id: CameraModelId::Pinhole,
        name: "PINHOLE",
        num_params: 4,
    },
    CameraModelDescriptor {
        id: CameraModelId::SimpleRadial,
        name: "SIMPLE_RADIAL",
        num_params: 4,
    },
    CameraModelDescriptor {
        id: CameraModelId::Radial,
        name: "RADIAL",
        num_params: 5,
    },
    CameraModelDescriptor {
        id: CameraModelId::OpenCV,
        name: "OPENCV",
        num_params: 8,
    },
    CameraModelDescriptor {
        id: CameraModelId::OpenCVFisheye,
        name: "OPENCV_FISHEYE",
        num_params: 8,
    },
    CameraModelDescriptor {
        id: CameraModelId::FullOpenCV,
        name: "FULL_OPENCV",
        num_params: 12,
    },
    CameraModelDescriptor {
        id: CameraModelId::FOV,
        name: "FOV",
        num_params: 5,
    },
    CameraModelDescriptor {
        id: CameraModelId::SimpleRadialFisheye,
        name: "SIMPLE_RADIAL_FISHEYE",
        num_params: 4,
    },
    CameraModelDescriptor {
        id: CameraModelId::RadialFisheye,
        name: "RADIAL_FISHEYE",
        num_params: 5,
    },
    CameraModelDescriptor {
        id: CameraModelId::ThinPrismFisheye,
        name: "THIN_PRISM_FISHEYE",
        num_params: 12,
    },
];

/// Look up a camera model by its numeric id.
///
/// # Arguments
///
/// * `model_id` - The model id as stored in the cameras section.
///
/// # Returns
///
/// The static descriptor of the model, or [`ColmapError::UnknownCameraModel`].
///
/// Example:
///
/// ```
/// use sfmview_colmap::camera_models::resolve;
///
/// let model = resolve(1).unwrap();
/// assert_eq!(model.name, "PINHOLE");
/// assert_eq!(model.num_params, 4);
/// assert!(resolve(99).is_err());
/// ```
pub fn resolve(model_id: i32) -> Result<&'static CameraModelDescriptor, ColmapError> {
    CAMERA_MODELS
        .iter()
        .find(|model| model.model_id() == model_id)
        .ok_or(ColmapError::UnknownCameraModel(model_id))
}

/// Look up a camera model by its symbolic name.
pub fn resolve_name(name: &str) -> Result<&'static CameraModelDescriptor, ColmapError> {
    CAMERA_MODELS
        .iter()
        .find(|model| model.name == name)
        .ok_or_else(|| ColmapError::UnknownCameraModelName(name.to_string()))
}
