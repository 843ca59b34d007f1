use glam::{Mat4, Vec2};

/// Orthographic 2D camera. World space is y-up, viewport space is pixels
/// from the top-left corner, y-down.
pub struct Camera2D {
    pub position: Vec2,
    /// World units visible from bottom to top of the viewport
    pub visible_height: f32,
    pub width: u32,
    pub height: u32,
}

impl Camera2D {
    pub fn new(width: u32, height: u32, visible_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            visible_height,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn pixels_per_unit(&self) -> f32 {
        self.height as f32 / self.visible_height
    }

    pub fn viewport_to_world(&self, viewport: Vec2) -> Vec2 {
        let ppu = self.pixels_per_unit();
        let half = Vec2::new(self.width as f32, self.height as f32) * 0.5;
        Vec2::new(
            (viewport.x - half.x) / ppu + self.position.x,
            (half.y - viewport.y) / ppu + self.position.y,
        )
    }

    pub fn view_proj(&self) -> Mat4 {
        let half_h = self.visible_height * 0.5;
        let half_w = half_h * self.width as f32 / self.height as f32;
        Mat4::orthographic_rh(
            self.position.x - half_w,
            self.position.x + half_w,
            self.position.y - half_h,
            self.position.y + half_h,
            -1.0,
            1.0,
        )
    }
}
