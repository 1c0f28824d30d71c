// Affine 4x3 transform: 3x3 linear part plus translation

use crate::error::{Result, TransformError};
use crate::euler_angles::EulerAngles;
use crate::math_util::{sin_cos, SINGULAR_DETERMINANT};
use crate::quaternion::Quaternion;
use crate::rotation_matrix::RotationMatrix;
use crate::vector3::Vector3;

/// A cardinal axis, for the axis-aligned setup functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// An affine transform acting on row vectors: `p' = p * M + t`.
///
/// The upper 3x3 may hold any linear map (rotation, scale, shear, reflection,
/// projection). The translation is always applied last, so `a.compose(&b)`
/// transforms a point by `a` and then by `b`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AffineMatrix4x3 {
    pub m11: f32,
    pub m12: f32,
    pub m13: f32,
    pub m21: f32,
    pub m22: f32,
    pub m23: f32,
    pub m31: f32,
    pub m32: f32,
    pub m33: f32,
    pub tx: f32,
    pub ty: f32,
    pub tz: f32,
}

impl Default for AffineMatrix4x3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn require_unit(v: &Vector3, operation: &'static str) -> Result<()> {
    if v.is_unit() {
        Ok(())
    } else {
        Err(TransformError::degenerate(operation, "axis is not unit length"))
    }
}

impl AffineMatrix4x3 {
    pub const IDENTITY: AffineMatrix4x3 = AffineMatrix4x3::linear(
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0,
    );

    /// Matrix with the given linear part and no translation.
    #[allow(clippy::too_many_arguments)]
    const fn linear(
        m11: f32,
        m12: f32,
        m13: f32,
        m21: f32,
        m22: f32,
        m23: f32,
        m31: f32,
        m32: f32,
        m33: f32,
    ) -> Self {
        Self {
            m11,
            m12,
            m13,
            m21,
            m22,
            m23,
            m31,
            m32,
            m33,
            tx: 0.0,
            ty: 0.0,
            tz: 0.0,
        }
    }

    pub fn identity(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn zero_translation(&mut self) {
        self.tx = 0.0;
        self.ty = 0.0;
        self.tz = 0.0;
    }

    /// Replaces the translation, keeping the linear part.
    pub fn set_translation(&mut self, d: Vector3) {
        self.tx = d.x;
        self.ty = d.y;
        self.tz = d.z;
    }

    /// Pure translation by `d`.
    pub fn from_translation(d: Vector3) -> Self {
        let mut m = Self::IDENTITY;
        m.set_translation(d);
        m
    }

    /// Local→parent transform for an object at `pos` with orientation `orient`
    /// (an inertial→object matrix, hence copied transposed).
    pub fn local_to_parent(pos: Vector3, orient: &RotationMatrix) -> Self {
        let mut m = Self::linear(
            orient.m11, orient.m21, orient.m31, //
            orient.m12, orient.m22, orient.m32, //
            orient.m13, orient.m23, orient.m33,
        );
        m.set_translation(pos);
        m
    }

    pub fn local_to_parent_euler(pos: Vector3, orient: &EulerAngles) -> Self {
        Self::local_to_parent(pos, &RotationMatrix::from_euler(orient))
    }

    /// Parent→local transform: translate by `-pos`, then rotate.
    ///
    /// The translation is stored pre-rotated (`-pos * R`) because it is always
    /// applied after the linear part.
    pub fn parent_to_local(pos: Vector3, orient: &RotationMatrix) -> Self {
        let mut m = Self::linear(
            orient.m11, orient.m12, orient.m13, //
            orient.m21, orient.m22, orient.m23, //
            orient.m31, orient.m32, orient.m33,
        );
        m.set_translation(-m.transform_vector(pos));
        m
    }

    pub fn parent_to_local_euler(pos: Vector3, orient: &EulerAngles) -> Self {
        Self::parent_to_local(pos, &RotationMatrix::from_euler(orient))
    }

    /// Rotation by `theta` about a cardinal axis through the origin.
    pub fn rotate(axis: Axis, theta: f32) -> Self {
        let (s, c) = sin_cos(theta);
        match axis {
            Axis::X => Self::linear(
                1.0, 0.0, 0.0, //
                0.0, c, s, //
                0.0, -s, c,
            ),
            Axis::Y => Self::linear(
                c, 0.0, -s, //
                0.0, 1.0, 0.0, //
                s, 0.0, c,
            ),
            Axis::Z => Self::linear(
                c, s, 0.0, //
                -s, c, 0.0, //
                0.0, 0.0, 1.0,
            ),
        }
    }

    /// Rotation by `theta` about an arbitrary unit axis through the origin.
    pub fn rotate_about_axis(axis: Vector3, theta: f32) -> Result<Self> {
        require_unit(&axis, "AffineMatrix4x3::rotate_about_axis")?;

        let (s, c) = sin_cos(theta);
        let a = 1.0 - c;
        let ax = a * axis.x;
        let ay = a * axis.y;
        let az = a * axis.z;

        Ok(Self::linear(
            ax * axis.x + c,
            ax * axis.y + axis.z * s,
            ax * axis.z - axis.y * s,
            ay * axis.x - axis.z * s,
            ay * axis.y + c,
            ay * axis.z + axis.x * s,
            az * axis.x + axis.y * s,
            az * axis.y - axis.x * s,
            az * axis.z + c,
        ))
    }

    /// Rotation by the angular displacement `q`, with no translation.
    pub fn from_quaternion(q: &Quaternion) -> Self {
        let ww = 2.0 * q.w;
        let xx = 2.0 * q.x;
        let yy = 2.0 * q.y;
        let zz = 2.0 * q.z;

        Self::linear(
            1.0 - yy * q.y - zz * q.z,
            xx * q.y + ww * q.z,
            xx * q.z - ww * q.y,
            xx * q.y - ww * q.z,
            1.0 - xx * q.x - zz * q.z,
            yy * q.z + ww * q.x,
            xx * q.z + ww * q.y,
            yy * q.z - ww * q.x,
            1.0 - xx * q.x - yy * q.y,
        )
    }

    /// Scale by `s.x`, `s.y`, `s.z` along the cardinal axes.
    pub fn scale(s: Vector3) -> Self {
        Self::linear(
            s.x, 0.0, 0.0, //
            0.0, s.y, 0.0, //
            0.0, 0.0, s.z,
        )
    }

    /// Scale by `k` along a unit axis through the origin.
    pub fn scale_along_axis(axis: Vector3, k: f32) -> Result<Self> {
        require_unit(&axis, "AffineMatrix4x3::scale_along_axis")?;

        let a = k - 1.0;
        let ax = a * axis.x;
        let ay = a * axis.y;
        let az = a * axis.z;

        Ok(Self::linear(
            ax * axis.x + 1.0,
            ax * axis.y,
            az * axis.x,
            ax * axis.y,
            ay * axis.y + 1.0,
            ay * axis.z,
            az * axis.x,
            ay * axis.z,
            az * axis.z + 1.0,
        ))
    }

    /// Shear the two other coordinates by `s` and `t` times the `axis` coordinate.
    ///
    /// For `Axis::X`: `y' = y + s·x`, `z' = z + t·x`.
    pub fn shear(axis: Axis, s: f32, t: f32) -> Self {
        match axis {
            Axis::X => Self::linear(
                1.0, s, t, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0,
            ),
            Axis::Y => Self::linear(
                1.0, 0.0, 0.0, //
                s, 1.0, t, //
                0.0, 0.0, 1.0,
            ),
            Axis::Z => Self::linear(
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                s, t, 1.0,
            ),
        }
    }

    /// Orthographic projection onto the plane through the origin with unit normal `n`.
    pub fn project(n: Vector3) -> Result<Self> {
        require_unit(&n, "AffineMatrix4x3::project")?;

        Ok(Self::linear(
            1.0 - n.x * n.x,
            -n.x * n.y,
            -n.z * n.x,
            -n.x * n.y,
            1.0 - n.y * n.y,
            -n.y * n.z,
            -n.z * n.x,
            -n.y * n.z,
            1.0 - n.z * n.z,
        ))
    }

    /// Reflection about the plane `axis = k`.
    ///
    /// Unlike the other setups this sets a translation of `2k` along `axis`,
    /// which keeps the mirror plane at `k` rather than at the origin.
    pub fn reflect_axis(axis: Axis, k: f32) -> Self {
        let mut m = Self::IDENTITY;
        match axis {
            Axis::X => {
                m.m11 = -1.0;
                m.tx = 2.0 * k;
            }
            Axis::Y => {
                m.m22 = -1.0;
                m.ty = 2.0 * k;
            }
            Axis::Z => {
                m.m33 = -1.0;
                m.tz = 2.0 * k;
            }
        }
        m
    }

    /// Reflection about the plane through the origin with unit normal `n`.
    pub fn reflect(n: Vector3) -> Result<Self> {
        require_unit(&n, "AffineMatrix4x3::reflect")?;

        let ax = -2.0 * n.x;
        let ay = -2.0 * n.y;
        let az = -2.0 * n.z;

        Ok(Self::linear(
            1.0 + ax * n.x,
            ax * n.y,
            az * n.x,
            ax * n.y,
            1.0 + ay * n.y,
            ay * n.z,
            az * n.x,
            ay * n.z,
            1.0 + az * n.z,
        ))
    }

    /// Rotate by `rotation`, then scale by `scale` along the parent axes, then
    /// translate to `position`.
    pub fn from_pose(position: Vector3, rotation: &Quaternion, scale: Vector3) -> Self {
        let mut m = Self::from_quaternion(rotation).compose(&Self::scale(scale));
        m.set_translation(position);
        m
    }

    /// `v * M` without the translation, for directions.
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        Vector3::new(
            v.x * self.m11 + v.y * self.m21 + v.z * self.m31,
            v.x * self.m12 + v.y * self.m22 + v.z * self.m32,
            v.x * self.m13 + v.y * self.m23 + v.z * self.m33,
        )
    }

    /// `p * M + t`.
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        self.transform_vector(p) + self.translation()
    }

    /// The transform that applies `self` first and then `b`.
    ///
    /// Not commutative: `a.compose(&b)` is `A·B` in row-vector order.
    pub fn compose(&self, b: &AffineMatrix4x3) -> AffineMatrix4x3 {
        let a = self;
        AffineMatrix4x3 {
            m11: a.m11 * b.m11 + a.m12 * b.m21 + a.m13 * b.m31,
            m12: a.m11 * b.m12 + a.m12 * b.m22 + a.m13 * b.m32,
            m13: a.m11 * b.m13 + a.m12 * b.m23 + a.m13 * b.m33,

            m21: a.m21 * b.m11 + a.m22 * b.m21 + a.m23 * b.m31,
            m22: a.m21 * b.m12 + a.m22 * b.m22 + a.m23 * b.m32,
            m23: a.m21 * b.m13 + a.m22 * b.m23 + a.m23 * b.m33,

            m31: a.m31 * b.m11 + a.m32 * b.m21 + a.m33 * b.m31,
            m32: a.m31 * b.m12 + a.m32 * b.m22 + a.m33 * b.m32,
            m33: a.m31 * b.m13 + a.m32 * b.m23 + a.m33 * b.m33,

            tx: a.tx * b.m11 + a.ty * b.m21 + a.tz * b.m31 + b.tx,
            ty: a.tx * b.m12 + a.ty * b.m22 + a.tz * b.m32 + b.ty,
            tz: a.tx * b.m13 + a.ty * b.m23 + a.tz * b.m33 + b.tz,
        }
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f32 {
        self.m11 * (self.m22 * self.m33 - self.m23 * self.m32)
            + self.m12 * (self.m23 * self.m31 - self.m21 * self.m33)
            + self.m13 * (self.m21 * self.m32 - self.m22 * self.m31)
    }

    /// Inverse transform, or `SingularMatrix` when the linear part cannot be inverted.
    pub fn inverse(&self) -> Result<AffineMatrix4x3> {
        let det = self.determinant();
        if det.abs() < SINGULAR_DETERMINANT {
            log::debug!("refusing to invert singular matrix (det = {det})");
            return Err(TransformError::SingularMatrix { determinant: det });
        }

        let inv_det = 1.0 / det;
        let mut r = Self::linear(
            (self.m22 * self.m33 - self.m23 * self.m32) * inv_det,
            (self.m13 * self.m32 - self.m12 * self.m33) * inv_det,
            (self.m12 * self.m23 - self.m13 * self.m22) * inv_det,
            (self.m23 * self.m31 - self.m21 * self.m33) * inv_det,
            (self.m11 * self.m33 - self.m13 * self.m31) * inv_det,
            (self.m13 * self.m21 - self.m11 * self.m23) * inv_det,
            (self.m21 * self.m32 - self.m22 * self.m31) * inv_det,
            (self.m12 * self.m31 - self.m11 * self.m32) * inv_det,
            (self.m11 * self.m22 - self.m12 * self.m21) * inv_det,
        );
        r.set_translation(-r.transform_vector(self.translation()));
        Ok(r)
    }

    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.tx, self.ty, self.tz)
    }

    /// Object position encoded in a rigid parent→local matrix.
    pub fn position_from_parent_to_local(&self) -> Vector3 {
        // -t * Rᵀ, since the linear part of a rigid transform is orthonormal.
        Vector3::new(
            -(self.tx * self.m11 + self.ty * self.m12 + self.tz * self.m13),
            -(self.tx * self.m21 + self.ty * self.m22 + self.tz * self.m23),
            -(self.tx * self.m31 + self.ty * self.m32 + self.tz * self.m33),
        )
    }

    /// Object position encoded in a local→parent matrix.
    pub fn position_from_local_to_parent(&self) -> Vector3 {
        self.translation()
    }

    /// Lengths of the columns of the linear part.
    ///
    /// For a rotate-then-scale matrix such as [`AffineMatrix4x3::from_pose`]
    /// builds, these are the scale factors.
    pub fn scale_factors(&self) -> Vector3 {
        Vector3::new(
            Vector3::new(self.m11, self.m21, self.m31).magnitude(),
            Vector3::new(self.m12, self.m22, self.m32).magnitude(),
            Vector3::new(self.m13, self.m23, self.m33).magnitude(),
        )
    }

    /// Orientation of a local→parent matrix. See [`RotationMatrix::from_affine`].
    pub fn rotation(&self, scaled: bool) -> Result<RotationMatrix> {
        RotationMatrix::from_affine(self, scaled)
    }
}
