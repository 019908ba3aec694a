use crate::scene::serde_utils::dvec3_serializer;
use glam::f64::{DMat4, DQuat, DVec3};
use glam::EulerRot;
use serde::{Deserialize, Serialize};

/// Placement of a scene node: position, rotation (Euler angles in degrees,
/// XYZ order, matching the project file format) and per-axis scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(with = "dvec3_serializer")]
    pub position: DVec3,
    #[serde(with = "dvec3_serializer")]
    pub rotation: DVec3,
    #[serde(with = "dvec3_serializer")]
    pub scale: DVec3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }

    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn rotation_quat(&self) -> DQuat {
        DQuat::from_euler(
            EulerRot::XYZ,
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians(),
        )
    }

    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }

    /// Apply this transform to a position vector
    pub fn apply_to_position(&self, position: DVec3) -> DVec3 {
        self.rotation_quat()
            .mul_vec3(position * self.scale)
            + self.position
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
