use glam::{DMat3, DMat4, DQuat, DVec3};
use sfmview_colmap::ImageRecord;

use crate::intrinsics::CameraIntrinsics;
use crate::rotation::{rotation_from_qvec, AXIS_CORRECTION};

/// Reference image size, in pixels, of the frustum normalization.
pub const FRUSTUM_REFERENCE_SIZE: f64 = 1024.0;

/// Divisor applied to the relative image size by the frustum normalization.
pub const FRUSTUM_SIZE_DIVISOR: f64 = 0.5;

/// A line segment in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// First end point.
    pub start: DVec3,
    /// Second end point.
    pub end: DVec3,
}

/// Placement of the image-plane quad of a frustum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlane {
    /// Center of the quad in world space.
    pub center: DVec3,
    /// Extent along the camera x axis.
    pub width: f64,
    /// Extent along the camera y axis.
    pub height: f64,
    /// Orientation of the quad, camera to world.
    pub rotation: DMat3,
}

/// Frustum geometry of a camera in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Back-projected image corners (0,0), (w,0), (0,h) and (w,h).
    pub corners: [DVec3; 4],
    /// Back-projected principal point.
    pub principal: DVec3,
    /// Segments from the camera position to each corner.
    pub edges: [Segment; 4],
    /// The image-plane quad.
    pub image_plane: ImagePlane,
}

impl Frustum {
    /// A zero-size frustum collapsed onto the camera position.
    pub fn collapsed(position: DVec3, rotation: DMat3) -> Self {
        let edge = Segment {
            start: position,
            end: position,
        };
        Self {
            corners: [position; 4],
            principal: position,
            edges: [edge; 4],
            image_plane: ImagePlane {
                center: position,
                width: 0.0,
                height: 0.0,
                rotation,
            },
        }
    }

    /// Whether all the corners collapsed onto the camera position.
    pub fn is_degenerate(&self) -> bool {
        self.edges.iter().all(|edge| edge.start == edge.end)
    }
}

/// Render-ready transform of a registered image.
///
/// The rotations and the position are expressed in the renderer world axes,
/// i.e. after the axis correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseTransform {
    /// Corrected world to camera rotation.
    pub rotation: DMat3,
    /// Corrected camera to world rotation.
    pub rotation_t: DMat3,
    /// Camera center in world space.
    pub position: DVec3,
    /// Viewing direction in world space.
    pub forward: DVec3,
    /// Camera to world transform.
    pub world_from_camera: DMat4,
    /// Frustum geometry, present only when intrinsics are known.
    pub frustum: Option<Frustum>,
}

impl PoseTransform {
    /// Compute the transform of an image.
    ///
    /// # Arguments
    ///
    /// * `image` - The decoded image with its world to camera pose.
    /// * `intrinsics` - The intrinsics of the image camera, if known.
    /// * `display_scale` - Scale applied to the camera matrix, the matrix is divided by it.
    ///
    /// # Returns
    ///
    /// The transform, with a frustum when intrinsics are given.
    pub fn from_image(
        image: &ImageRecord,
        intrinsics: Option<&CameraIntrinsics>,
        display_scale: f64,
    ) -> Self {
        Self::from_pose(&image.qvec, &image.tvec, intrinsics, display_scale)
    }

    /// Compute the transform of a world to camera pose.
    ///
    /// # Arguments
    ///
    /// * `qvec` - The rotation quaternion as (qw, qx, qy, qz).
    /// * `tvec` - The translation.
    /// * `intrinsics` - The camera intrinsics, if known.
    /// * `display_scale` - Scale applied to the camera matrix, the matrix is divided by it.
    ///
    /// # Returns
    ///
    /// The transform, with a frustum when intrinsics are given.
    ///
    /// Example:
    ///
    /// ```
    /// use glam::DVec3;
    /// use sfmview_geometry::PoseTransform;
    ///
    /// let pose = PoseTransform::from_pose(&[1.0, 0.0, 0.0, 0.0], &[0.0, 0.0, 0.0], None, 0.25);
    /// assert_eq!(pose.position, DVec3::ZERO);
    /// assert_eq!(pose.forward, DVec3::Z);
    /// assert!(pose.frustum.is_none());
    /// ```
    pub fn from_pose(
        qvec: &[f64; 4],
        tvec: &[f64; 3],
        intrinsics: Option<&CameraIntrinsics>,
        display_scale: f64,
    ) -> Self {
        let r = rotation_from_qvec(qvec);
        let r_t = r.transpose();

        // camera center in the reconstruction world
        let center = -(r_t * DVec3::from_array(*tvec));

        let rotation = AXIS_CORRECTION * r;
        let rotation_t = AXIS_CORRECTION * r_t;
        let position = AXIS_CORRECTION * center;
        let forward = rotation_t * DVec3::Z;

        let world_from_camera = DMat4::from_cols(
            rotation_t.x_axis.extend(0.0),
            rotation_t.y_axis.extend(0.0),
            rotation_t.z_axis.extend(0.0),
            position.extend(1.0),
        );

        let frustum =
            intrinsics.map(|k| compute_frustum(k, display_scale, &rotation_t, position));

        Self {
            rotation,
            rotation_t,
            position,
            forward,
            world_from_camera,
            frustum,
        }
    }

    /// Orientation of the camera as a quaternion, camera to world.
    pub fn orientation(&self) -> DQuat {
        DQuat::from_mat3(&self.rotation_t)
    }
}

/// Scale factor keeping frustums of different cameras comparable in size.
///
/// Returns `None` when the factor is not finite.
pub fn frustum_normalization(intrinsics: &CameraIntrinsics) -> Option<f64> {
    let max_size = intrinsics.width.max(intrinsics.height);
    let norm = (intrinsics.mean_focal() / FRUSTUM_REFERENCE_SIZE)
        / ((max_size / FRUSTUM_REFERENCE_SIZE) / FRUSTUM_SIZE_DIVISOR);
    norm.is_finite().then_some(norm)
}

fn compute_frustum(
    intrinsics: &CameraIntrinsics,
    display_scale: f64,
    rotation_t: &DMat3,
    position: DVec3,
) -> Frustum {
    let collapsed = Frustum::collapsed(position, *rotation_t);

    if !display_scale.is_finite() || display_scale <= 0.0 {
        log::debug!("non positive display scale {display_scale}, collapsing frustum");
        return collapsed;
    }

    let k = intrinsics.camera_matrix() * display_scale.recip();
    let det = k.determinant();
    if det == 0.0 || !det.is_finite() {
        return collapsed;
    }

    let Some(norm) = frustum_normalization(intrinsics) else {
        return collapsed;
    };

    let k_inv = k.inverse();
    let (w, h) = (intrinsics.width, intrinsics.height);

    // pixel to normalized camera coordinates
    let back_project = |u: f64, v: f64| k_inv * DVec3::new(u, v, 1.0) * norm;
    let camera_corners = [
        back_project(0.0, 0.0),
        back_project(w, 0.0),
        back_project(0.0, h),
        back_project(w, h),
    ];
    let camera_principal = back_project(intrinsics.cx, intrinsics.cy);

    let to_world = |p: DVec3| *rotation_t * p + position;
    let principal = to_world(camera_principal);
    let corners = camera_corners.map(to_world);

    let edges = corners.map(|corner| Segment {
        start: position,
        end: corner,
    });

    let image_plane = ImagePlane {
        center: principal,
        width: (camera_corners[1].x - camera_corners[0].x).abs(),
        height: (camera_corners[2].y - camera_corners[0].y).abs(),
        rotation: *rotation_t,
    };

    Frustum {
        corners,
        principal,
        edges,
        image_plane,
    }
}
