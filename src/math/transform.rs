use glam::{Mat4, Quat, Vec3};

/// World-space placement of a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    pub fn from_matrix(matrix: Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (point * self.scale) + self.position
    }

    /// Copies position and rotation from `other`, keeping this node's scale.
    /// This is what a host's "match transform" does for controller groups.
    pub fn matched_to(&self, other: &Self) -> Self {
        Self {
            position: other.position,
            rotation: other.rotation,
            scale: self.scale,
        }
    }

    /// Returns the transform with its scale reset to one, along with the scale
    /// that was removed so the caller can bake it into shape data.
    pub fn frozen_scale(&self) -> (Self, Vec3) {
        (
            Self {
                scale: Vec3::ONE,
                ..*self
            },
            self.scale,
        )
    }

    pub fn has_identity_scale(&self) -> bool {
        self.scale.abs_diff_eq(Vec3::ONE, 1e-6)
    }
}
