// Conversions to and from glam, for handing results to a renderer

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::matrix4x3::AffineMatrix4x3;
use crate::quaternion::Quaternion;
use crate::vector3::Vector3;

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Quat> for Quaternion {
    fn from(q: Quat) -> Self {
        Quaternion::new(q.w, q.x, q.y, q.z)
    }
}

impl From<Quaternion> for Quat {
    fn from(q: Quaternion) -> Self {
        Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

/// glam multiplies column vectors, so each row of the 3x3 becomes a column and
/// the translation becomes the last column.
impl From<AffineMatrix4x3> for Mat4 {
    fn from(m: AffineMatrix4x3) -> Self {
        Mat4::from_cols(
            Vec4::new(m.m11, m.m12, m.m13, 0.0),
            Vec4::new(m.m21, m.m22, m.m23, 0.0),
            Vec4::new(m.m31, m.m32, m.m33, 0.0),
            Vec4::new(m.tx, m.ty, m.tz, 1.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::euler_angles::EulerAngles;
    use approx::assert_abs_diff_eq;

    #[test]
    fn mat4_transforms_points_the_same_way() {
        let m = AffineMatrix4x3::from_pose(
            Vector3::new(1.0, -2.0, 0.5),
            &Quaternion::object_to_inertial(&EulerAngles::new(0.9, 0.1, -0.4)),
            Vector3::new(2.0, 1.0, 0.5),
        );
        let p = Vector3::new(0.3, 4.0, -1.0);

        let ours = m.transform_point(p);
        let theirs: Vector3 = Mat4::from(m).transform_point3(p.into()).into();
        assert_abs_diff_eq!(ours.x, theirs.x, epsilon = 1e-5);
        assert_abs_diff_eq!(ours.y, theirs.y, epsilon = 1e-5);
        assert_abs_diff_eq!(ours.z, theirs.z, epsilon = 1e-5);
    }

    #[test]
    fn quaternions_rotate_the_same_way() {
        let q = Quaternion::about_z(0.7) * Quaternion::about_x(-1.2);
        let p = Vector3::new(1.0, 2.0, 3.0);

        let ours = AffineMatrix4x3::from_quaternion(&q).transform_point(p);
        let theirs: Vector3 = Quat::from(q).mul_vec3(p.into()).into();
        assert_abs_diff_eq!(ours.x, theirs.x, epsilon = 1e-5);
        assert_abs_diff_eq!(ours.y, theirs.y, epsilon = 1e-5);
        assert_abs_diff_eq!(ours.z, theirs.z, epsilon = 1e-5);

        assert_eq!(Quaternion::from(Quat::from(q)), q);
    }
}
