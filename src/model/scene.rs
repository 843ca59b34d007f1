use glam::Vec2;

use crate::model::Transform2D;

/// Everything on screen: a single shuriken pinned at the world origin
pub struct Scene {
    pub shuriken: Transform2D,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            shuriken: Transform2D {
                position: Vec2::ZERO,
                scale: Vec2::splat(2.0),
                rotation: 45.0,
            },
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
