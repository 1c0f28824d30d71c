// Pure 3x3 rotation matrix

use crate::error::{Result, TransformError};
use crate::euler_angles::EulerAngles;
use crate::math_util::sin_cos;
use crate::matrix4x3::AffineMatrix4x3;
use crate::quaternion::Quaternion;
use crate::vector3::Vector3;

/// An orthonormal 3x3 matrix that rotates inertial space into object space
/// when a row vector is multiplied on the left (`v * M`).
///
/// Object→inertial is the transpose. The matrix never carries scale or shear.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RotationMatrix {
    pub m11: f32,
    pub m12: f32,
    pub m13: f32,
    pub m21: f32,
    pub m22: f32,
    pub m23: f32,
    pub m31: f32,
    pub m32: f32,
    pub m33: f32,
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl RotationMatrix {
    pub const IDENTITY: RotationMatrix = RotationMatrix {
        m11: 1.0,
        m12: 0.0,
        m13: 0.0,
        m21: 0.0,
        m22: 1.0,
        m23: 0.0,
        m31: 0.0,
        m32: 0.0,
        m33: 1.0,
    };

    pub fn identity(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Matrix for an orientation: `H⁻¹ · P⁻¹ · B⁻¹` expanded.
    pub fn from_euler(orientation: &EulerAngles) -> Self {
        let (sh, ch) = sin_cos(orientation.heading);
        let (sp, cp) = sin_cos(orientation.pitch);
        let (sb, cb) = sin_cos(orientation.bank);

        Self {
            m11: ch * cb + sh * sp * sb,
            m12: -ch * sb + sh * sp * cb,
            m13: sh * cp,
            m21: sb * cp,
            m22: cb * cp,
            m23: -sp,
            m31: -sh * cb + ch * sp * sb,
            m32: sb * sh + ch * sp * cb,
            m33: ch * cp,
        }
    }

    /// Matrix from a quaternion that rotates inertial space into object space.
    pub fn from_inertial_to_object_quaternion(q: &Quaternion) -> Self {
        Self {
            m11: 1.0 - 2.0 * (q.y * q.y + q.z * q.z),
            m12: 2.0 * (q.x * q.y + q.w * q.z),
            m13: 2.0 * (q.x * q.z - q.w * q.y),
            m21: 2.0 * (q.x * q.y - q.w * q.z),
            m22: 1.0 - 2.0 * (q.x * q.x + q.z * q.z),
            m23: 2.0 * (q.y * q.z + q.w * q.x),
            m31: 2.0 * (q.x * q.z + q.w * q.y),
            m32: 2.0 * (q.y * q.z - q.w * q.x),
            m33: 1.0 - 2.0 * (q.x * q.x + q.y * q.y),
        }
    }

    /// Matrix from a quaternion that rotates object space into inertial space.
    pub fn from_object_to_inertial_quaternion(q: &Quaternion) -> Self {
        Self {
            m11: 1.0 - 2.0 * (q.y * q.y + q.z * q.z),
            m12: 2.0 * (q.x * q.y - q.w * q.z),
            m13: 2.0 * (q.x * q.z + q.w * q.y),
            m21: 2.0 * (q.x * q.y + q.w * q.z),
            m22: 1.0 - 2.0 * (q.x * q.x + q.z * q.z),
            m23: 2.0 * (q.y * q.z - q.w * q.x),
            m31: 2.0 * (q.x * q.z - q.w * q.y),
            m32: 2.0 * (q.y * q.z + q.w * q.x),
            m33: 1.0 - 2.0 * (q.x * q.x + q.y * q.y),
        }
    }

    /// Rotation part of a local→parent affine matrix.
    ///
    /// With `scaled` set, each column is divided by its length first, which
    /// undoes a rotate-then-scale matrix. The result is meaningless if the
    /// matrix contains shear.
    pub fn from_affine(m: &AffineMatrix4x3, scaled: bool) -> Result<Self> {
        let (sx, sy, sz) = if scaled {
            let s = m.scale_factors();
            if s.x <= 0.0 || s.y <= 0.0 || s.z <= 0.0 {
                return Err(TransformError::degenerate(
                    "RotationMatrix::from_affine",
                    "matrix collapses an axis to zero length",
                ));
            }
            (s.x, s.y, s.z)
        } else {
            (1.0, 1.0, 1.0)
        };

        // Local→parent is object→inertial, so the stored matrix is the transpose.
        Ok(Self {
            m11: m.m11 / sx,
            m12: m.m21 / sx,
            m13: m.m31 / sx,
            m21: m.m12 / sy,
            m22: m.m22 / sy,
            m23: m.m32 / sy,
            m31: m.m13 / sz,
            m32: m.m23 / sz,
            m33: m.m33 / sz,
        })
    }

    pub fn transpose(&self) -> Self {
        Self {
            m11: self.m11,
            m12: self.m21,
            m13: self.m31,
            m21: self.m12,
            m22: self.m22,
            m23: self.m32,
            m31: self.m13,
            m32: self.m23,
            m33: self.m33,
        }
    }

    pub fn determinant(&self) -> f32 {
        self.m11 * (self.m22 * self.m33 - self.m23 * self.m32)
            + self.m12 * (self.m23 * self.m31 - self.m21 * self.m33)
            + self.m13 * (self.m21 * self.m32 - self.m22 * self.m31)
    }

    /// `v * M`.
    pub fn inertial_to_object(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            self.m11 * v.x + self.m21 * v.y + self.m31 * v.z,
            self.m12 * v.x + self.m22 * v.y + self.m32 * v.z,
            self.m13 * v.x + self.m23 * v.y + self.m33 * v.z,
        )
    }

    /// `v * Mᵀ`, the inverse rotation.
    pub fn object_to_inertial(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            self.m11 * v.x + self.m12 * v.y + self.m13 * v.z,
            self.m21 * v.x + self.m22 * v.y + self.m23 * v.z,
            self.m31 * v.x + self.m32 * v.y + self.m33 * v.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_matrix_eq(a: &RotationMatrix, b: &RotationMatrix) {
        let a: &[f32; 9] = bytemuck::cast_ref(a);
        let b: &[f32; 9] = bytemuck::cast_ref(b);
        for (x, y) in a.iter().zip(b) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-5);
        }
    }

    #[test]
    fn euler_setup_matches_quaternion_setup() {
        for e in [
            EulerAngles::new(0.3, 0.2, 0.1),
            EulerAngles::new(-2.2, 1.1, 2.9),
            EulerAngles::new(1.0, -1.4, -0.7),
        ] {
            let from_euler = RotationMatrix::from_euler(&e);
            let via_object = RotationMatrix::from_object_to_inertial_quaternion(
                &Quaternion::object_to_inertial(&e),
            );
            let via_inertial = RotationMatrix::from_inertial_to_object_quaternion(
                &Quaternion::inertial_to_object(&e),
            );
            assert_matrix_eq(&from_euler, &via_object);
            assert_matrix_eq(&from_euler, &via_inertial);
            assert_abs_diff_eq!(from_euler.determinant(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn quaternion_directions_are_transposes() {
        let q = Quaternion::from_axis_angle(Vector3::new(0.48, 0.6, 0.64), 0.9);
        assert_matrix_eq(
            &RotationMatrix::from_inertial_to_object_quaternion(&q),
            &RotationMatrix::from_object_to_inertial_quaternion(&q).transpose(),
        );
    }

    #[test]
    fn identity_leaves_vectors_alone() {
        let v = Vector3::new(1.5, -2.0, 0.25);
        assert_eq!(RotationMatrix::IDENTITY.inertial_to_object(v), v);
        assert_eq!(RotationMatrix::IDENTITY.object_to_inertial(v), v);
        assert_eq!(RotationMatrix::default(), RotationMatrix::IDENTITY);
    }

    #[test]
    fn object_to_inertial_undoes_inertial_to_object() {
        let m = RotationMatrix::from_euler(&EulerAngles::new(0.8, -0.3, 1.7));
        let v = Vector3::new(3.0, -1.0, 2.0);
        let back = m.object_to_inertial(m.inertial_to_object(v));
        assert_abs_diff_eq!(back.x, v.x, epsilon = 1e-5);
        assert_abs_diff_eq!(back.y, v.y, epsilon = 1e-5);
        assert_abs_diff_eq!(back.z, v.z, epsilon = 1e-5);
    }

    #[test]
    fn heading_turns_forward_towards_right() {
        // Object +Z (forward) after a quarter turn of heading points along inertial +X.
        let m = RotationMatrix::from_euler(&EulerAngles::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0));
        let forward = m.object_to_inertial(Vector3::Z);
        assert_abs_diff_eq!(forward.x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(forward.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn extracts_rotation_from_scaled_affine() {
        let q = Quaternion::object_to_inertial(&EulerAngles::new(0.4, 0.5, -0.6));
        let m = AffineMatrix4x3::from_pose(Vector3::new(1.0, 2.0, 3.0), &q, Vector3::new(2.0, 0.5, 3.0));
        let r = RotationMatrix::from_affine(&m, true).unwrap();
        assert_matrix_eq(&r, &RotationMatrix::from_object_to_inertial_quaternion(&q));

        let flat = AffineMatrix4x3::scale(Vector3::new(1.0, 0.0, 1.0));
        assert!(RotationMatrix::from_affine(&flat, true).is_err());
    }
}
