// Heading/pitch/bank orientation

use std::f32::consts::{FRAC_PI_2, PI};

use crate::math_util::{wrap_pi, CANONICAL_POLE_EPSILON, GIMBAL_LOCK_SINE};
use crate::matrix4x3::AffineMatrix4x3;
use crate::quaternion::Quaternion;
use crate::rotation_matrix::RotationMatrix;

/// An orientation as heading (about +Y), pitch (about +X) and bank (about +Z),
/// in radians.
///
/// Going from object to inertial space, bank is applied first, then pitch,
/// then heading. The triple is only meaningful as an orientation: it is not an
/// angular velocity, and [`EulerAngles::canonize`] would change the meaning of
/// one.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EulerAngles {
    pub heading: f32,
    pub pitch: f32,
    pub bank: f32,
}

/// Result of pulling sin(pitch) out of a rotation and deciding which branch applies.
enum PitchBranch {
    /// Heading and bank share an axis; only one combination of them is observable.
    GimbalLock { pitch: f32 },
    General { pitch: f32 },
}

fn classify_pitch(sin_pitch: f32) -> PitchBranch {
    if sin_pitch.abs() > GIMBAL_LOCK_SINE {
        // asin is ill-conditioned this close to ±1, so snap to the pole.
        PitchBranch::GimbalLock {
            pitch: FRAC_PI_2.copysign(sin_pitch),
        }
    } else {
        PitchBranch::General {
            pitch: sin_pitch.asin(),
        }
    }
}

impl EulerAngles {
    pub const IDENTITY: EulerAngles = EulerAngles::new(0.0, 0.0, 0.0);

    pub const fn new(heading: f32, pitch: f32, bank: f32) -> Self {
        Self {
            heading,
            pitch,
            bank,
        }
    }

    pub fn identity(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Rewrites the triple into canonical form without changing the orientation.
    ///
    /// Afterwards heading and bank lie in (-π, π] and pitch in [-π/2, π/2].
    /// Within [`CANONICAL_POLE_EPSILON`] of a pole, bank is folded into heading
    /// and set to zero.
    pub fn canonize(&mut self) {
        self.pitch = wrap_pi(self.pitch);

        // Past a pole: mirror pitch back and turn around in heading and bank.
        if self.pitch < -FRAC_PI_2 {
            self.pitch = -PI - self.pitch;
            self.heading += PI;
            self.bank += PI;
        } else if self.pitch > FRAC_PI_2 {
            self.pitch = PI - self.pitch;
            self.heading += PI;
            self.bank += PI;
        }

        // At a pole heading and bank turn about the same world axis: in the
        // same sense looking down (-π/2), opposite senses looking up (+π/2).
        if self.pitch.abs() > FRAC_PI_2 - CANONICAL_POLE_EPSILON {
            if self.pitch > 0.0 {
                self.heading -= self.bank;
            } else {
                self.heading += self.bank;
            }
            self.bank = 0.0;
        } else {
            self.bank = wrap_pi(self.bank);
        }

        self.heading = wrap_pi(self.heading);
    }

    /// Canonized copy of `self`.
    pub fn canonical(&self) -> Self {
        let mut out = *self;
        out.canonize();
        out
    }

    fn from_branch(
        branch: PitchBranch,
        locked_heading: impl FnOnce() -> f32,
        heading: impl FnOnce() -> f32,
        bank: impl FnOnce() -> f32,
    ) -> Self {
        match branch {
            PitchBranch::GimbalLock { pitch } => {
                log::trace!("gimbal lock at pitch {pitch}, bank forced to zero");
                Self::new(locked_heading(), pitch, 0.0)
            }
            PitchBranch::General { pitch } => Self::new(heading(), pitch, bank()),
        }
    }

    /// Orientation described by an object→inertial quaternion.
    pub fn from_object_to_inertial_quaternion(q: &Quaternion) -> Self {
        let sp = -2.0 * (q.y * q.z - q.w * q.x);
        Self::from_branch(
            classify_pitch(sp),
            || (q.w * q.y - q.x * q.z).atan2(0.5 - q.y * q.y - q.z * q.z),
            || (q.x * q.z + q.w * q.y).atan2(0.5 - q.x * q.x - q.y * q.y),
            || (q.x * q.y + q.w * q.z).atan2(0.5 - q.x * q.x - q.z * q.z),
        )
    }

    /// Orientation described by an inertial→object quaternion.
    pub fn from_inertial_to_object_quaternion(q: &Quaternion) -> Self {
        let sp = -2.0 * (q.y * q.z + q.w * q.x);
        Self::from_branch(
            classify_pitch(sp),
            || (-q.x * q.z - q.w * q.y).atan2(0.5 - q.y * q.y - q.z * q.z),
            || (q.x * q.z - q.w * q.y).atan2(0.5 - q.x * q.x - q.y * q.y),
            || (q.x * q.y - q.w * q.z).atan2(0.5 - q.x * q.x - q.z * q.z),
        )
    }

    /// Orientation of an object→world affine matrix. Translation is ignored and
    /// the linear part must be a pure rotation.
    pub fn from_object_to_world_matrix(m: &AffineMatrix4x3) -> Self {
        // The linear part is object→inertial, the transpose of RotationMatrix.
        let sp = -m.m32;
        Self::from_branch(
            classify_pitch(sp),
            || (-m.m13).atan2(m.m11),
            || m.m31.atan2(m.m33),
            || m.m12.atan2(m.m22),
        )
    }

    /// Orientation of a world→object affine matrix. Translation is ignored and
    /// the linear part must be a pure rotation.
    pub fn from_world_to_object_matrix(m: &AffineMatrix4x3) -> Self {
        let sp = -m.m23;
        Self::from_branch(
            classify_pitch(sp),
            || (-m.m31).atan2(m.m11),
            || m.m13.atan2(m.m33),
            || m.m21.atan2(m.m22),
        )
    }

    /// Orientation of an inertial→object rotation matrix.
    pub fn from_rotation_matrix(m: &RotationMatrix) -> Self {
        let sp = -m.m23;
        Self::from_branch(
            classify_pitch(sp),
            || (-m.m31).atan2(m.m11),
            || m.m13.atan2(m.m33),
            || m.m21.atan2(m.m22),
        )
    }
}
