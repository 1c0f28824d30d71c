// 3D vector type

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::{Result, TransformError};

/// A 3D vector or point. Treated as a row vector by the matrix types.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    pub const ONE: Vector3 = Vector3::new(1.0, 1.0, 1.0);
    pub const X: Vector3 = Vector3::new(1.0, 0.0, 0.0);
    pub const Y: Vector3 = Vector3::new(0.0, 1.0, 0.0);
    pub const Z: Vector3 = Vector3::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Resets every component to zero.
    pub fn zero(&mut self) {
        *self = Self::ZERO;
    }

    #[inline]
    pub fn dot(&self, other: &Vector3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product `self × other`.
    ///
    /// The formula is the usual one; in the library's left-handed frame the
    /// result follows the left-hand rule.
    #[inline]
    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - other.y * self.z,
            self.z * other.x - other.z * self.x,
            self.x * other.y - other.x * self.y,
        )
    }

    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Distance between two points.
    pub fn distance(&self, other: &Vector3) -> f32 {
        (*self - *other).magnitude()
    }

    /// Scales the vector to unit length.
    ///
    /// A zero vector is left untouched, so callers must not assume unit
    /// length afterwards. Use [`Vector3::try_normalize`] to detect that case.
    pub fn normalize(&mut self) {
        let mag_sq = self.magnitude_squared();
        if mag_sq > 0.0 {
            *self *= 1.0 / mag_sq.sqrt();
        }
    }

    /// Returns a unit-length copy, or `DegenerateInput` for a zero vector.
    pub fn try_normalize(&self) -> Result<Vector3> {
        let mag_sq = self.magnitude_squared();
        if mag_sq > 0.0 {
            Ok(*self * (1.0 / mag_sq.sqrt()))
        } else {
            Err(TransformError::degenerate(
                "Vector3::try_normalize",
                "vector has zero length",
            ))
        }
    }

    /// True when `|self·self - 1|` is within [`UNIT_AXIS_TOLERANCE`](crate::math_util::UNIT_AXIS_TOLERANCE).
    pub fn is_unit(&self) -> bool {
        (self.magnitude_squared() - 1.0).abs() < crate::math_util::UNIT_AXIS_TOLERANCE
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(self, k: f32) -> Vector3 {
        Vector3::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Mul<Vector3> for f32 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        v * self
    }
}

impl Div<f32> for Vector3 {
    type Output = Vector3;

    fn div(self, k: f32) -> Vector3 {
        self * (1.0 / k)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Vector3 {
    fn mul_assign(&mut self, k: f32) {
        *self = *self * k;
    }
}

impl DivAssign<f32> for Vector3 {
    fn div_assign(&mut self, k: f32) {
        *self = *self / k;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-2.0, 0.5, 4.0);
        assert_eq!(a + b, Vector3::new(-1.0, 2.5, 7.0));
        assert_eq!(a - b, Vector3::new(3.0, 1.5, -1.0));
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(a.dot(&b), -2.0 + 1.0 + 12.0);

        let mut c = a;
        c += b;
        c -= b;
        c *= 4.0;
        c /= 4.0;
        assert_eq!(c, a);
    }

    #[test]
    fn cross_of_basis_vectors() {
        assert_eq!(Vector3::X.cross(&Vector3::Y), Vector3::Z);
        assert_eq!(Vector3::Y.cross(&Vector3::Z), Vector3::X);
        assert_eq!(Vector3::Y.cross(&Vector3::X), -Vector3::Z);
    }

    #[test]
    fn magnitude_and_distance() {
        let v = Vector3::new(3.0, 4.0, 12.0);
        assert_eq!(v.magnitude(), 13.0);
        assert_eq!(Vector3::ZERO.distance(&v), 13.0);
        assert_eq!(v.distance(&v), 0.0);
    }

    #[test]
    fn normalize_zero_vector_is_a_no_op() {
        let mut v = Vector3::ZERO;
        v.normalize();
        assert_eq!(v, Vector3::ZERO);
        assert!(matches!(
            v.try_normalize(),
            Err(TransformError::DegenerateInput { .. })
        ));
    }

    #[test]
    fn normalize_gives_unit_length() {
        let mut v = Vector3::new(0.0, -5.0, 5.0);
        v.normalize();
        assert_abs_diff_eq!(v.magnitude(), 1.0, epsilon = 1e-6);
        assert!(v.is_unit());
        assert!(!Vector3::new(2.0, 0.0, 0.0).is_unit());
    }
}
