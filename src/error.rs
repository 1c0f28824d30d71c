// Error types for intsar-math

use thiserror::Error;

/// Failures reported by conversions, normalizations and inversions.
///
/// Gimbal lock is not represented here: it is a fully defined branch of the
/// Euler conversions and never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The input cannot describe the requested geometry (zero-length vector or
    /// quaternion, non-unit axis where a unit axis is required).
    #[error("degenerate input to {operation}: {reason}")]
    DegenerateInput {
        operation: &'static str,
        reason: &'static str,
    },
    /// The linear part of an affine matrix has (nearly) zero determinant.
    #[error("matrix is singular (determinant {determinant})")]
    SingularMatrix { determinant: f32 },
}

impl TransformError {
    pub(crate) fn degenerate(operation: &'static str, reason: &'static str) -> Self {
        Self::DegenerateInput { operation, reason }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
