// IntSar-3D math core: rotations and affine transforms
//
// Conventions: left-handed coordinates, row vectors (`p * M`), heading about
// +Y, pitch about +X, bank about +Z.

pub mod error;
pub mod euler_angles;
pub mod glam_interop;
pub mod math_util;
pub mod matrix4x3;
pub mod quaternion;
pub mod rotation_matrix;
pub mod transform;
pub mod vector3;

pub use error::{Result, TransformError};
pub use euler_angles::EulerAngles;
pub use matrix4x3::{AffineMatrix4x3, Axis};
pub use quaternion::Quaternion;
pub use rotation_matrix::RotationMatrix;
pub use transform::Transform;
pub use vector3::Vector3;
