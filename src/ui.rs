use egui::Context;

use crate::controller::GameState;

/// Run one egui pass over the overlay windows
pub fn build_ui(egui_ctx: &Context, raw_input: egui::RawInput, game: &mut GameState) -> egui::FullOutput {
    let canvas_width = game.camera.width;
    egui_ctx.run(raw_input, |ctx| draw_panels(ctx, game, canvas_width))
}

pub fn draw_panels(ctx: &Context, game: &mut GameState, canvas_width: u32) {
    draw_debug_window(ctx, game);
    draw_settings_window(ctx, game, canvas_width);
}

fn draw_debug_window(ctx: &Context, game: &GameState) {
    let shuriken = &game.scene.shuriken;
    let state = if game.rotation.is_dragging() { "dragging" } else { "spinning" };

    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .default_size([160.0, 100.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("FPS: {:.0}", game.stats.fps)).small());
            ui.label(egui::RichText::new(format!("Rotation: {:.1}°", shuriken.rotation)).small());
            ui.label(egui::RichText::new(format!("Speed: {:.2}°/tick", game.rotation.angular_velocity())).small());
            ui.label(egui::RichText::new(format!("State: {state}")).small());
            ui.separator();
            ui.label(egui::RichText::new("Drag the shuriken and let go").small());
        });
}

fn draw_settings_window(ctx: &Context, game: &mut GameState, canvas_width: u32) {
    egui::Window::new("Settings")
        .default_pos([canvas_width as f32 - 180.0, 8.0])
        .default_size([170.0, 100.0])
        .show(ctx, |ui| {
            let settings = game.rotation.settings_mut();
            ui.label(egui::RichText::new("Decay").small());
            ui.add(egui::Slider::new(&mut settings.decay_rate, 0.05..=5.0).logarithmic(true));
            ui.label(egui::RichText::new("Wrap threshold").small());
            ui.add(egui::Slider::new(&mut settings.wrap_threshold, 180.0..=359.0).step_by(1.0));
            ui.checkbox(&mut game.speed_tint, "Speed tint");
        });
}
