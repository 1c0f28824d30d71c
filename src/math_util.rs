// Angle helpers and numeric tolerances

use std::f32::consts::{PI, TAU};

/// |sin(pitch)| above which Euler extraction treats the orientation as gimbal locked.
pub const GIMBAL_LOCK_SINE: f32 = 0.999;

/// Distance from ±π/2 inside which `EulerAngles::canonize` folds bank into heading.
pub const CANONICAL_POLE_EPSILON: f32 = 1e-4;

/// cos(Ω) above which slerp falls back to a linear blend.
pub const SLERP_LINEAR_THRESHOLD: f32 = 0.999;

/// |w| above which `Quaternion::pow` returns its input unchanged.
pub const POW_IDENTITY_THRESHOLD: f32 = 0.999;

/// Allowed |n·n - 1| for inputs that must be unit vectors.
pub const UNIT_AXIS_TOLERANCE: f32 = 0.01;

/// |det| below which an affine matrix is considered non-invertible.
pub const SINGULAR_DETERMINANT: f32 = 1e-6;

/// Wraps an angle into (-π, π].
///
/// Angles already in range come back bit-for-bit unchanged, so wrapping twice
/// is the same as wrapping once.
pub fn wrap_pi(theta: f32) -> f32 {
    if theta > -PI && theta <= PI {
        return theta;
    }
    let shifted = theta + PI;
    let wrapped = shifted - (shifted / TAU).floor() * TAU - PI;
    // Round-off can land exactly on the excluded end of the interval.
    if wrapped <= -PI {
        PI
    } else {
        wrapped
    }
}

/// `acos` clamped to [-1, 1], so round-off past the domain edge never yields NaN.
pub fn safe_acos(x: f32) -> f32 {
    if x <= -1.0 {
        return PI;
    }
    if x >= 1.0 {
        return 0.0;
    }
    x.acos()
}

/// Returns `(sin θ, cos θ)`.
#[inline]
pub fn sin_cos(theta: f32) -> (f32, f32) {
    theta.sin_cos()
}
