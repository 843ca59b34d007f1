use winit::{
    event::*,
    event_loop::EventLoop,
    window::Window,
};
use std::sync::Arc;

// Import from the library crate
use fidget_shuriken::{
    config, controller, logging, ui, view,
};

use config::AppConfig;
use controller::{input, GameState, InputEvent};
use fidget_shuriken::error::SetupError;
use view::{render, texture, GpuContext, RenderState, SpriteTexture};

/// Longest frame step handed to the simulation, in seconds
const MAX_FRAME_STEP: f32 = 0.1;

struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    render_state: RenderState,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    game: GameState,
    last_frame_time: std::time::Instant,
}

impl App {
    async fn new(window: Arc<Window>, config: &AppConfig) -> Result<Self, SetupError> {
        let size = window.inner_size();
        let gpu = GpuContext::new_native(window.clone(), size.width.max(1), size.height.max(1)).await?;

        let image = texture::load_shuriken_image()?;
        let sprite_texture = SpriteTexture::from_image(&gpu.device, &gpu.queue, &image, "shuriken");
        let sprite = render::create_sprite_resources(&gpu.device, gpu.format, sprite_texture);
        let render_state = RenderState::new(&gpu.device, &gpu.config, sprite);

        // Initialize egui
        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let game = GameState::new(config, gpu.config.width, gpu.config.height);
        tracing::info!(width = gpu.config.width, height = gpu.config.height, "shuriken ready");

        Ok(Self {
            window,
            gpu,
            render_state,
            egui_state,
            egui_ctx,
            game,
            last_frame_time: std::time::Instant::now(),
        })
    }

    fn input(&mut self, event: &WindowEvent) {
        // egui sees everything first; presses it claims never reach the shuriken
        let egui_captured = self.egui_state.on_window_event(self.window.as_ref(), event).consumed;
        let ui_wants_pointer = egui_captured
            || self.egui_ctx.wants_pointer_input()
            || self.egui_ctx.is_pointer_over_area();

        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let moved = InputEvent::PointerMoved { x: position.x as f32, y: position.y as f32 };
                self.game.handle_input(&moved, false);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = input::native::mouse_input_to_input(*state, *button, self.game.input_state.cursor_pos);
                self.game.handle_input(&pressed, ui_wants_pointer);
            }
            WindowEvent::Focused(false) => {
                self.game.handle_input(&InputEvent::FocusLost, false);
            }
            _ => {}
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        tracing::debug!(width = new_size.width, height = new_size.height, "resizing window");
        self.render_state
            .resize(&self.gpu.device, &self.gpu.surface, new_size.width, new_size.height);
        self.game.resize(new_size.width, new_size.height);
    }

    fn frame(&mut self) {
        let now = std::time::Instant::now();
        let dt = (now - self.last_frame_time).as_secs_f32().clamp(0.0, MAX_FRAME_STEP);
        self.last_frame_time = now;

        self.game.update(dt);
        self.render_state
            .write_uniforms(&self.gpu.queue, &self.game.camera, &self.game.scene.shuriken);

        let raw_input = self.egui_state.take_egui_input(&self.window);
        let canvas_width = self.game.camera.width;
        let game = &mut self.game;
        let output = self.egui_ctx.run(raw_input, |ctx| ui::draw_panels(ctx, game, canvas_width));
        self.egui_state.handle_platform_output(&self.window, output.platform_output);

        let dpr = self.window.scale_factor() as f32;
        let primitives = self.egui_ctx.tessellate(output.shapes, dpr);
        self.render_state.set_ui(primitives, output.textures_delta, dpr);

        let clear = self.game.clear_color();
        self.render_state
            .draw_frame(&self.gpu.device, &self.gpu.queue, &self.gpu.surface, clear);
    }
}

fn main() {
    logging::init();
    let config = AppConfig::load();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    let window_attributes = Window::default_attributes()
        .with_title("Fidget Shuriken")
        .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));
    let window = match event_loop.create_window(window_attributes) {
        Ok(window) => Arc::new(window),
        Err(e) => {
            tracing::error!("failed to create window: {e}");
            std::process::exit(1);
        }
    };

    let mut app = match pollster::block_on(App::new(window, &config)) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("setup failed: {e}");
            std::process::exit(1);
        }
    };

    let result = event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                app.input(event);
                match event {
                    WindowEvent::CloseRequested => elwt.exit(),
                    WindowEvent::Resized(physical_size) => app.resize(*physical_size),
                    WindowEvent::RedrawRequested => app.frame(),
                    _ => {}
                }
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        }
    });
    if let Err(e) = result {
        tracing::error!("event loop exited with error: {e}");
    }
}
