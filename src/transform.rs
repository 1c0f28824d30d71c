// Position/rotation/scale poses built on the affine matrix

use crate::error::Result;
use crate::euler_angles::EulerAngles;
use crate::matrix4x3::AffineMatrix4x3;
use crate::quaternion::{self, Quaternion};
use crate::vector3::Vector3;

/// Represents a 3D transformation relative to a parent space
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Transform {
    pub position: Vector3,
    /// Object→parent rotation.
    pub rotation: Quaternion,
    pub scale: Vector3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create a new transform
    pub fn new(position: Vector3, rotation: Quaternion, scale: Vector3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create a transform from an Euler orientation
    pub fn from_euler(position: Vector3, orientation: &EulerAngles, scale: Vector3) -> Self {
        Self::new(position, Quaternion::object_to_inertial(orientation), scale)
    }

    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            position: Vector3::ZERO,
            rotation: Quaternion::IDENTITY,
            scale: Vector3::ONE,
        }
    }

    /// Generate the local→parent matrix: rotate, then scale, then translate
    pub fn matrix(&self) -> AffineMatrix4x3 {
        AffineMatrix4x3::from_pose(self.position, &self.rotation, self.scale)
    }

    /// Local→world matrix given the parent's own local→world matrix
    pub fn world_matrix(&self, parent_world: &AffineMatrix4x3) -> AffineMatrix4x3 {
        self.matrix().compose(parent_world)
    }

    /// Map a point from local space into parent space
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        self.matrix().transform_point(p)
    }

    /// Blend towards `other`: position and scale linearly, rotation by slerp
    pub fn interpolate(&self, other: &Transform, t: f32) -> Transform {
        let mut rotation = quaternion::slerp(&self.rotation, &other.rotation, t);
        // A zero blend is already logged and replaced by the identity.
        let _ = rotation.normalize();

        Transform {
            position: self.position + (other.position - self.position) * t,
            rotation,
            scale: self.scale + (other.scale - self.scale) * t,
        }
    }

    /// Recover a transform from a rotate-then-scale-then-translate matrix
    ///
    /// Fails if an axis has been scaled to zero. Shear is not representable and
    /// produces an arbitrary rotation.
    pub fn from_matrix(m: &AffineMatrix4x3) -> Result<Transform> {
        let rotation_matrix = m.rotation(true)?;
        let mut rotation = Quaternion::from_rotation_matrix(&rotation_matrix);
        rotation.normalize()?;

        Ok(Transform {
            position: m.translation(),
            rotation,
            scale: m.scale_factors(),
        })
    }
}
