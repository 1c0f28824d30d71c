// Unit quaternion rotations

use std::ops::{Mul, MulAssign, Neg};

use crate::error::{Result, TransformError};
use crate::euler_angles::EulerAngles;
use crate::math_util::{safe_acos, sin_cos, POW_IDENTITY_THRESHOLD, SLERP_LINEAR_THRESHOLD};
use crate::rotation_matrix::RotationMatrix;
use crate::vector3::Vector3;

/// A quaternion `w + xi + yj + zk`.
///
/// Only unit quaternions represent rotations. `q` and `-q` represent the same
/// rotation.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// The identity rotation.
    pub const IDENTITY: Quaternion = Quaternion::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Resets to the identity rotation.
    pub fn identity(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn about_x(theta: f32) -> Self {
        let (s, c) = sin_cos(theta * 0.5);
        Self::new(c, s, 0.0, 0.0)
    }

    pub fn about_y(theta: f32) -> Self {
        let (s, c) = sin_cos(theta * 0.5);
        Self::new(c, 0.0, s, 0.0)
    }

    pub fn about_z(theta: f32) -> Self {
        let (s, c) = sin_cos(theta * 0.5);
        Self::new(c, 0.0, 0.0, s)
    }

    /// Rotation of `theta` radians about `axis`, which must be unit length.
    pub fn from_axis_angle(axis: Vector3, theta: f32) -> Self {
        debug_assert!(axis.is_unit(), "rotation axis must be unit length");
        let (s, c) = sin_cos(theta * 0.5);
        Self::new(c, axis.x * s, axis.y * s, axis.z * s)
    }

    /// Quaternion rotating object space into inertial space for `orientation`.
    ///
    /// Equal to `heading * pitch * bank`: bank is applied first.
    pub fn object_to_inertial(orientation: &EulerAngles) -> Self {
        let (sh, ch) = sin_cos(orientation.heading * 0.5);
        let (sp, cp) = sin_cos(orientation.pitch * 0.5);
        let (sb, cb) = sin_cos(orientation.bank * 0.5);

        Self::new(
            ch * cp * cb + sh * sp * sb,
            ch * sp * cb + sh * cp * sb,
            sh * cp * cb - ch * sp * sb,
            ch * cp * sb - sh * sp * cb,
        )
    }

    /// Quaternion rotating inertial space into object space for `orientation`.
    ///
    /// Equal to `bank⁻¹ * pitch⁻¹ * heading⁻¹`: heading is undone first.
    pub fn inertial_to_object(orientation: &EulerAngles) -> Self {
        let (sh, ch) = sin_cos(orientation.heading * 0.5);
        let (sp, cp) = sin_cos(orientation.pitch * 0.5);
        let (sb, cb) = sin_cos(orientation.bank * 0.5);

        Self::new(
            ch * cp * cb + sh * sp * sb,
            -ch * sp * cb - sh * cp * sb,
            ch * sp * sb - sh * cp * cb,
            sh * sp * cb - ch * cp * sb,
        )
    }

    pub fn magnitude(&self) -> f32 {
        dot(self, self).sqrt()
    }

    /// Rescales to unit length.
    ///
    /// A zero quaternion is not a rotation: it is reset to the identity and
    /// `DegenerateInput` is returned.
    pub fn normalize(&mut self) -> Result<()> {
        let mag = self.magnitude();
        if mag > 0.0 {
            let inv = 1.0 / mag;
            self.w *= inv;
            self.x *= inv;
            self.y *= inv;
            self.z *= inv;
            Ok(())
        } else {
            log::warn!("normalizing a zero quaternion, resetting to identity");
            self.identity();
            Err(TransformError::degenerate(
                "Quaternion::normalize",
                "quaternion has zero magnitude",
            ))
        }
    }

    /// Rotation angle in radians, in [0, 2π].
    pub fn rotation_angle(&self) -> f32 {
        safe_acos(self.w) * 2.0
    }

    /// Unit rotation axis. Returns +X when the rotation is (numerically) the identity.
    pub fn rotation_axis(&self) -> Vector3 {
        let sin_half_sq = 1.0 - self.w * self.w;
        if sin_half_sq <= 0.0 {
            return Vector3::X;
        }
        let inv = 1.0 / sin_half_sq.sqrt();
        Vector3::new(self.x * inv, self.y * inv, self.z * inv)
    }

    /// Object→inertial quaternion for an inertial→object rotation matrix.
    ///
    /// Exact at every orientation, including near the pitch poles where the
    /// Euler conversions snap to gimbal lock. The sign of the result is arbitrary.
    pub fn from_rotation_matrix(m: &RotationMatrix) -> Self {
        // 4w² - 1, 4x² - 1, ... ; recover the largest component from its square
        // and the rest from sums/differences of off-diagonal pairs.
        let four_w_sq_minus_1 = m.m11 + m.m22 + m.m33;
        let four_x_sq_minus_1 = m.m11 - m.m22 - m.m33;
        let four_y_sq_minus_1 = m.m22 - m.m11 - m.m33;
        let four_z_sq_minus_1 = m.m33 - m.m11 - m.m22;

        let mut biggest = four_w_sq_minus_1;
        let mut index = 0;
        for (i, v) in [four_x_sq_minus_1, four_y_sq_minus_1, four_z_sq_minus_1]
            .into_iter()
            .enumerate()
        {
            if v > biggest {
                biggest = v;
                index = i + 1;
            }
        }

        let biggest_val = (biggest + 1.0).sqrt() * 0.5;
        let mult = 0.25 / biggest_val;

        match index {
            0 => Self::new(
                biggest_val,
                (m.m32 - m.m23) * mult,
                (m.m13 - m.m31) * mult,
                (m.m21 - m.m12) * mult,
            ),
            1 => Self::new(
                (m.m32 - m.m23) * mult,
                biggest_val,
                (m.m12 + m.m21) * mult,
                (m.m13 + m.m31) * mult,
            ),
            2 => Self::new(
                (m.m13 - m.m31) * mult,
                (m.m12 + m.m21) * mult,
                biggest_val,
                (m.m23 + m.m32) * mult,
            ),
            _ => Self::new(
                (m.m21 - m.m12) * mult,
                (m.m13 + m.m31) * mult,
                (m.m23 + m.m32) * mult,
                biggest_val,
            ),
        }
    }
}

/// Hamilton product. `a * b` rotates by `b` first, then by `a`.
impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, a: Quaternion) -> Quaternion {
        Quaternion::new(
            self.w * a.w - self.x * a.x - self.y * a.y - self.z * a.z,
            self.w * a.x + self.x * a.w + self.y * a.z - self.z * a.y,
            self.w * a.y + self.y * a.w + self.z * a.x - self.x * a.z,
            self.w * a.z + self.z * a.w + self.x * a.y - self.y * a.x,
        )
    }
}

impl MulAssign for Quaternion {
    fn mul_assign(&mut self, rhs: Quaternion) {
        *self = *self * rhs;
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        Quaternion::new(-self.w, -self.x, -self.y, -self.z)
    }
}

/// Four-component dot product.
pub fn dot(a: &Quaternion, b: &Quaternion) -> f32 {
    a.w * b.w + a.x * b.x + a.y * b.y + a.z * b.z
}

/// Spherical linear interpolation from `q0` (t = 0) to `q1` (t = 1) along the
/// shorter arc.
///
/// The result is not renormalized.
pub fn slerp(q0: &Quaternion, q1: &Quaternion, t: f32) -> Quaternion {
    if t <= 0.0 {
        return *q0;
    }
    if t >= 1.0 {
        return *q1;
    }

    let mut cos_omega = dot(q0, q1);

    // q1 and -q1 are the same rotation; pick the one on q0's side of the sphere.
    let mut target = *q1;
    if cos_omega < 0.0 {
        target = -target;
        cos_omega = -cos_omega;
    }
    debug_assert!(cos_omega < 1.1, "slerp inputs must be unit quaternions");

    let (k0, k1) = if cos_omega > SLERP_LINEAR_THRESHOLD {
        (1.0 - t, t)
    } else {
        let sin_omega = (1.0 - cos_omega * cos_omega).sqrt();
        let omega = sin_omega.atan2(cos_omega);
        let inv_sin_omega = 1.0 / sin_omega;
        (
            ((1.0 - t) * omega).sin() * inv_sin_omega,
            (t * omega).sin() * inv_sin_omega,
        )
    };

    Quaternion::new(
        k0 * q0.w + k1 * target.w,
        k0 * q0.x + k1 * target.x,
        k0 * q0.y + k1 * target.y,
        k0 * q0.z + k1 * target.z,
    )
}

/// The opposite rotation of a unit quaternion.
pub fn conjugate(q: &Quaternion) -> Quaternion {
    Quaternion::new(q.w, -q.x, -q.y, -q.z)
}

/// Scales the rotation angle of `q` by `exponent`.
///
/// Near-identity inputs come back unchanged, since their axis is undefined.
pub fn pow(q: &Quaternion, exponent: f32) -> Quaternion {
    if q.w.abs() > POW_IDENTITY_THRESHOLD {
        return *q;
    }

    let alpha = q.w.acos();
    let new_alpha = alpha * exponent;
    let mult = new_alpha.sin() / alpha.sin();

    Quaternion::new(new_alpha.cos(), q.x * mult, q.y * mult, q.z * mult)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn assert_quat_eq(a: Quaternion, b: Quaternion) {
        assert_abs_diff_eq!(a.w, b.w, epsilon = 1e-5);
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-5);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-5);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-5);
    }

    #[test]
    fn zero_euler_is_identity() {
        assert_quat_eq(
            Quaternion::object_to_inertial(&EulerAngles::IDENTITY),
            Quaternion::IDENTITY,
        );
        assert_quat_eq(
            Quaternion::inertial_to_object(&EulerAngles::IDENTITY),
            Quaternion::IDENTITY,
        );
    }

    #[test]
    fn euler_expansion_matches_axis_products() {
        let e = EulerAngles::new(0.7, -0.4, 1.9);
        let expected = Quaternion::about_y(e.heading)
            * Quaternion::about_x(e.pitch)
            * Quaternion::about_z(e.bank);
        assert_quat_eq(Quaternion::object_to_inertial(&e), expected);

        let undo = Quaternion::inertial_to_object(&e) * Quaternion::object_to_inertial(&e);
        assert_quat_eq(undo, Quaternion::IDENTITY);
    }

    #[test]
    fn axis_rotations_match_axis_angle() {
        assert_eq!(Quaternion::about_x(0.3), Quaternion::from_axis_angle(Vector3::X, 0.3));
        assert_eq!(Quaternion::about_y(0.3), Quaternion::from_axis_angle(Vector3::Y, 0.3));
        assert_eq!(Quaternion::about_z(0.3), Quaternion::from_axis_angle(Vector3::Z, 0.3));
    }

    #[test]
    fn normalize_zero_quaternion_resets_to_identity() {
        let mut q = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        assert!(matches!(
            q.normalize(),
            Err(TransformError::DegenerateInput { .. })
        ));
        assert_eq!(q, Quaternion::IDENTITY);
    }

    #[test]
    fn normalize_uses_every_component() {
        let mut q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        q.normalize().unwrap();
        assert_abs_diff_eq!(q.magnitude(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(q.z / q.w, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn angle_and_axis() {
        let axis = Vector3::new(1.0, 1.0, 0.0).try_normalize().unwrap();
        let q = Quaternion::from_axis_angle(axis, 1.2);
        assert_abs_diff_eq!(q.rotation_angle(), 1.2, epsilon = 1e-5);
        let recovered = q.rotation_axis();
        assert_abs_diff_eq!(recovered.x, axis.x, epsilon = 1e-5);
        assert_abs_diff_eq!(recovered.y, axis.y, epsilon = 1e-5);
        assert_abs_diff_eq!(recovered.z, axis.z, epsilon = 1e-5);

        assert_eq!(Quaternion::IDENTITY.rotation_axis(), Vector3::X);
        assert_eq!(Quaternion::IDENTITY.rotation_angle(), 0.0);
    }

    #[test]
    fn conjugate_undoes_rotation() {
        let q = Quaternion::from_axis_angle(Vector3::new(0.0, 0.6, 0.8), 2.1);
        assert_quat_eq(q * conjugate(&q), Quaternion::IDENTITY);
        assert_quat_eq(conjugate(&q) * q, Quaternion::IDENTITY);
    }

    #[test]
    fn slerp_endpoints_and_midpoint() {
        let q0 = Quaternion::about_z(0.0);
        let q1 = Quaternion::about_z(FRAC_PI_2);
        assert_eq!(slerp(&q0, &q1, 0.0), q0);
        assert_eq!(slerp(&q0, &q1, 1.0), q1);
        assert_eq!(slerp(&q0, &q1, -0.5), q0);
        assert_eq!(slerp(&q0, &q1, 2.0), q1);
        assert_quat_eq(slerp(&q0, &q1, 0.5), Quaternion::about_z(PI / 4.0));
    }

    #[test]
    fn slerp_same_quaternion_is_constant() {
        let q = Quaternion::object_to_inertial(&EulerAngles::new(0.3, 0.2, -1.0));
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_quat_eq(slerp(&q, &q, t), q);
        }
    }

    #[test]
    fn slerp_takes_the_short_way_round() {
        let q0 = Quaternion::about_y(0.2);
        let q1 = -Quaternion::about_y(0.8);
        assert!(dot(&q0, &q1) < 0.0);
        assert_quat_eq(slerp(&q0, &q1, 0.5), Quaternion::about_y(0.5));
    }

    #[test]
    fn rotation_matrix_converts_back_near_the_poles() {
        for e in [
            EulerAngles::new(0.3, 1.53, 0.5),
            EulerAngles::new(-2.0, -1.56, 1.2),
            EulerAngles::new(2.9, 0.2, -3.0),
            EulerAngles::new(0.0, 0.0, PI - 0.01),
        ] {
            let q = Quaternion::object_to_inertial(&e);
            let back = Quaternion::from_rotation_matrix(&RotationMatrix::from_euler(&e));
            assert_abs_diff_eq!(dot(&q, &back).abs(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn pow_scales_the_angle() {
        let q = Quaternion::about_x(1.0);
        assert_quat_eq(pow(&q, 0.5), Quaternion::about_x(0.5));
        assert_quat_eq(pow(&q, 2.0), Quaternion::about_x(2.0));

        let tiny = Quaternion::about_x(1e-3);
        assert_eq!(pow(&tiny, 0.5), tiny);
    }
}
