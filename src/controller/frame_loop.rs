use std::rc::Rc;
use std::cell::RefCell;
use web_sys::{HtmlCanvasElement, Window};

use crate::controller::GameState;
use crate::ui;
use crate::view::{GpuContext, RenderState};

/// Longest frame step handed to the simulation, in seconds
const MAX_FRAME_STEP: f64 = 0.1;
/// The canvas is sized in CSS pixels, so one egui point is one canvas pixel
const UI_PIXELS_PER_POINT: f32 = 1.0;

/// Per-frame update and draw for the web build
pub struct FrameLoopContext {
    pub gpu: GpuContext,
    pub render_state: RenderState,
    pub game: Rc<RefCell<GameState>>,
    pub canvas: HtmlCanvasElement,
    pub egui_ctx: egui::Context,
    pub egui_events: Rc<RefCell<Vec<egui::Event>>>,
    pub last_time: f64,
}

impl FrameLoopContext {
    pub fn frame(&mut self, window: &Window) {
        let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
        let dt = ((now - self.last_time) / 1000.0).clamp(0.0, MAX_FRAME_STEP) as f32;
        self.last_time = now;

        self.handle_resize(window);

        let mut game = self.game.borrow_mut();
        game.update(dt);
        self.render_state
            .write_uniforms(&self.gpu.queue, &game.camera, &game.scene.shuriken);

        // UI input from queued DOM events
        let dpr = UI_PIXELS_PER_POINT;
        let mut raw_input = egui::RawInput::default();
        raw_input.time = Some(now / 1000.0);
        raw_input.screen_rect = Some(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(self.render_state.width as f32 / dpr, self.render_state.height as f32 / dpr),
        ));
        raw_input.events.extend(self.egui_events.borrow_mut().drain(..));
        self.egui_ctx.set_pixels_per_point(dpr);

        let full_output = ui::build_ui(&self.egui_ctx, raw_input, &mut game);
        let primitives = self.egui_ctx.tessellate(full_output.shapes, dpr);
        self.render_state.set_ui(primitives, full_output.textures_delta, dpr);

        let clear = game.clear_color();
        drop(game);

        self.render_state
            .draw_frame(&self.gpu.device, &self.gpu.queue, &self.gpu.surface, clear);
    }

    fn handle_resize(&mut self, window: &Window) {
        let (Ok(w), Ok(h)) = (window.inner_width(), window.inner_height()) else {
            return;
        };
        let nw = w.as_f64().unwrap_or(800.0) as u32;
        let nh = h.as_f64().unwrap_or(600.0) as u32;
        if nw == 0 || nh == 0 || (nw == self.render_state.width && nh == self.render_state.height) {
            return;
        }

        tracing::debug!(width = nw, height = nh, "resizing canvas");
        self.canvas.set_width(nw);
        self.canvas.set_height(nh);
        self.render_state.resize(&self.gpu.device, &self.gpu.surface, nw, nh);
        self.game.borrow_mut().resize(nw, nh);
    }
}
