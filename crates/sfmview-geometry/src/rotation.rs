use glam::{DMat3, DVec3};

/// 180 degree rotation about the viewing axis, mapping the reconstruction
/// world axes onto the renderer world axes.
pub const AXIS_CORRECTION: DMat3 = DMat3::from_cols(
    DVec3::new(-1.0, 0.0, 0.0),
    DVec3::new(0.0, -1.0, 0.0),
    DVec3::new(0.0, 0.0, 1.0),
);

/// Compute the rotation matrix of a quaternion.
///
/// The quaternion is not normalized first, the conversion is the usual
/// closed form.
///
/// # Arguments
///
/// * `qvec` - The quaternion as (qw, qx, qy, qz).
///
/// # Returns
///
/// The 3x3 rotation matrix.
///
/// Example:
///
/// ```
/// use glam::DMat3;
/// use sfmview_geometry::rotation::rotation_from_qvec;
///
/// assert_eq!(rotation_from_qvec(&[1.0, 0.0, 0.0, 0.0]), DMat3::IDENTITY);
/// ```
pub fn rotation_from_qvec(qvec: &[f64; 4]) -> DMat3 {
    let [w, x, y, z] = *qvec;

    let m00 = 1.0 - 2.0 * y * y - 2.0 * z * z;
    let m01 = 2.0 * x * y - 2.0 * w * z;
    let m02 = 2.0 * z * x + 2.0 * w * y;

    let m10 = 2.0 * x * y + 2.0 * w * z;
    let m11 = 1.0 - 2.0 * x * x - 2.0 * z * z;
    let m12 = 2.0 * y * z - 2.0 * w * x;

    let m20 = 2.0 * z * x - 2.0 * w * y;
    let m21 = 2.0 * y * z + 2.0 * w * x;
    let m22 = 1.0 - 2.0 * x * x - 2.0 * y * y;

    // glam matrices are column major
    DMat3::from_cols(
        DVec3::new(m00, m10, m20),
        DVec3::new(m01, m11, m21),
        DVec3::new(m02, m12, m22),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_mat3_eq(a: DMat3, b: DMat3) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert_relative_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rotation_about_z() {
        let half = std::f64::consts::FRAC_PI_4;
        let r = rotation_from_qvec(&[half.cos(), 0.0, 0.0, half.sin()]);
        // x axis goes to y axis
        let v = r * DVec3::X;
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_matches_glam_for_unit_quaternions() {
        let q = glam::DQuat::from_xyzw(
            0.041015142534461625,
            -0.006827321814614928,
            0.009217952325488814,
            0.9990926759388453,
        )
        .normalize();
        let r = rotation_from_qvec(&[q.w, q.x, q.y, q.z]);
        assert_mat3_eq(r, DMat3::from_quat(q));
        assert_mat3_eq(r * r.transpose(), DMat3::IDENTITY);
    }

    #[test]
    fn test_axis_correction_is_a_rotation() {
        assert_relative_eq!(AXIS_CORRECTION.determinant(), 1.0);
        assert_mat3_eq(AXIS_CORRECTION * AXIS_CORRECTION, DMat3::IDENTITY);
    }
}
