use crate::config::AppConfig;
use crate::controller::input::{ButtonTransition, InputEvent, InputProcessor, InputState};
use crate::controller::rotation::RotationController;
use crate::model::{Camera2D, Scene};
use crate::utils::speed_tint;

/// Background grey when speed tinting is off
const CLEAR_GREY: f32 = 10.0 / 255.0;

/// FPS averaged over windows of at least a second
#[derive(Debug, Default)]
pub struct FrameStats {
    pub fps: f32,
    frame_count: u32,
    timer: f32,
}

impl FrameStats {
    pub fn record(&mut self, dt: f32) {
        self.frame_count += 1;
        self.timer += dt;
        if self.timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.timer;
            self.frame_count = 0;
            self.timer = 0.0;
        }
    }
}

/// The whole toy: input in, rotated shuriken out
pub struct GameState {
    pub scene: Scene,
    pub camera: Camera2D,
    pub rotation: RotationController,
    pub input_state: InputState,
    pub input_processor: InputProcessor,
    pub speed_tint: bool,
    pub stats: FrameStats,
}

impl GameState {
    pub fn new(config: &AppConfig, width: u32, height: u32) -> Self {
        Self {
            scene: Scene::new(),
            camera: Camera2D::new(width, height, config.visible_height),
            rotation: RotationController::new(config.spin),
            input_state: InputState::new(),
            input_processor: InputProcessor::default(),
            speed_tint: config.speed_tint,
            stats: FrameStats::default(),
        }
    }

    /// Feed one input event. `ui_wants_pointer` keeps clicks on the overlay
    /// from grabbing the shuriken; releases always go through.
    pub fn handle_input(&mut self, event: &InputEvent, ui_wants_pointer: bool) {
        let Some(transition) = self.input_processor.process(&mut self.input_state, event) else {
            return;
        };
        match transition {
            ButtonTransition::Pressed(_) if ui_wants_pointer => {}
            ButtonTransition::Pressed(viewport) => {
                let world = self.camera.viewport_to_world(viewport);
                if let Err(e) = self.rotation.on_pointer_down(world) {
                    tracing::warn!("ignoring pointer down: {e}");
                }
            }
            ButtonTransition::Released => self.rotation.on_pointer_up(),
        }
    }

    /// Advance one frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.stats.record(dt);
        let pointer = self.camera.viewport_to_world(self.input_state.cursor_pos);
        if let Err(e) = self.rotation.on_tick(&mut self.scene.shuriken, pointer, dt) {
            tracing::warn!("skipping spin update: {e}");
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let grey = if self.speed_tint {
            speed_tint(self.rotation.angular_velocity())
        } else {
            CLEAR_GREY
        } as f64;
        wgpu::Color { r: grey, g: grey, b: grey, a: 1.0 }
    }
}
