use glam::{Mat4, Quat, Vec2, Vec3};

/// Position, scale and orientation of a 2D entity.
///
/// `rotation` is in degrees and grows clockwise on screen, the way a canvas
/// `rotate` does. It is never wrapped into [0, 360).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub position: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

impl Transform2D {
    pub fn model_matrix(&self) -> Mat4 {
        // World is y-up, so clockwise means a negative turn about +Z
        Mat4::from_scale_rotation_translation(
            self.scale.extend(1.0),
            Quat::from_rotation_z(-self.rotation.to_radians()),
            Vec3::new(self.position.x, self.position.y, 0.0),
        )
    }
}
