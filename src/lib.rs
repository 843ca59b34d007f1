pub mod config;
pub mod error;
pub mod logging;
pub mod utils;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(target_arch = "wasm32")]
use {
    controller::{input, FrameLoopContext, GameState, InputEvent},
    std::{cell::RefCell, rc::Rc},
    view::{render, texture, GpuContext, RenderState, SpriteTexture},
    wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue},
    web_sys::{Document, Event, HtmlCanvasElement, MouseEvent, Window},
};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    logging::init();
    let (window, document, canvas) = init_canvas(800, 600)?;
    setup_app(&window, &document, &canvas).await
}

/// Main application setup for WASM
#[cfg(target_arch = "wasm32")]
async fn setup_app(
    window: &Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
) -> Result<(), JsValue> {
    let config = config::AppConfig::load();

    let gpu = GpuContext::new(canvas, canvas.width(), canvas.height())
        .await
        .map_err(js_error)?;
    let width = gpu.config.width;
    let height = gpu.config.height;

    let image = texture::load_shuriken_image().map_err(js_error)?;
    let sprite_texture = SpriteTexture::from_image(&gpu.device, &gpu.queue, &image, "shuriken");
    let sprite = render::create_sprite_resources(&gpu.device, gpu.format, sprite_texture);
    let render_state = RenderState::new(&gpu.device, &gpu.config, sprite);

    let game = Rc::new(RefCell::new(GameState::new(&config, width, height)));
    let egui_ctx = egui::Context::default();
    let egui_events: Rc<RefCell<Vec<egui::Event>>> = Rc::new(RefCell::new(Vec::new()));

    setup_input_listeners(document, window, canvas, game.clone(), egui_ctx.clone(), egui_events.clone())?;

    let mut frame_ctx = FrameLoopContext {
        gpu,
        render_state,
        game,
        canvas: canvas.clone(),
        egui_ctx,
        egui_events,
        last_time: window.performance().map(|p| p.now()).unwrap_or(0.0),
    };

    let window_for_loop = window.clone();
    run_animation_frames(window.clone(), move || frame_ctx.frame(&window_for_loop));

    tracing::info!(width, height, "shuriken ready");
    Ok(())
}

/// Forward pointer and focus events from the DOM into the game and egui
#[cfg(target_arch = "wasm32")]
fn setup_input_listeners(
    document: &Document,
    window: &Window,
    canvas: &HtmlCanvasElement,
    game: Rc<RefCell<GameState>>,
    egui_ctx: egui::Context,
    egui_events: Rc<RefCell<Vec<egui::Event>>>,
) -> Result<(), JsValue> {
    let ui_wants_pointer = {
        let egui_ctx = egui_ctx.clone();
        move || egui_ctx.wants_pointer_input() || egui_ctx.is_pointer_over_area()
    };

    // Pointer down - only on the canvas
    {
        let game = game.clone();
        let egui_events = egui_events.clone();
        let canvas_for_pos = canvas.clone();
        let pointerdown = Closure::wrap(Box::new(move |e: MouseEvent| {
            let event = input::wasm::pointer_button_to_input(&e, &canvas_for_pos, true);
            push_egui_event(&egui_events, &event);
            game.borrow_mut().handle_input(&event, ui_wants_pointer());
            e.prevent_default();
        }) as Box<dyn FnMut(MouseEvent)>);
        canvas.add_event_listener_with_callback("pointerdown", pointerdown.as_ref().unchecked_ref())?;
        pointerdown.forget();
    }

    // Pointer up - anywhere, so a drag released off-canvas still ends
    {
        let game = game.clone();
        let egui_events = egui_events.clone();
        let canvas_for_pos = canvas.clone();
        let pointerup = Closure::wrap(Box::new(move |e: MouseEvent| {
            let event = input::wasm::pointer_button_to_input(&e, &canvas_for_pos, false);
            push_egui_event(&egui_events, &event);
            game.borrow_mut().handle_input(&event, false);
        }) as Box<dyn FnMut(MouseEvent)>);
        document.add_event_listener_with_callback("pointerup", pointerup.as_ref().unchecked_ref())?;
        pointerup.forget();
    }

    // Pointer move
    {
        let game = game.clone();
        let egui_events = egui_events.clone();
        let canvas_for_pos = canvas.clone();
        let pointermove = Closure::wrap(Box::new(move |e: MouseEvent| {
            let event = input::wasm::pointer_move_to_input(&e, &canvas_for_pos);
            push_egui_event(&egui_events, &event);
            game.borrow_mut().handle_input(&event, false);
        }) as Box<dyn FnMut(MouseEvent)>);
        document.add_event_listener_with_callback("pointermove", pointermove.as_ref().unchecked_ref())?;
        pointermove.forget();
    }

    // Focus loss or a cancelled touch - let go
    let release_targets: [(&web_sys::EventTarget, &str); 2] =
        [(window.as_ref(), "blur"), (document.as_ref(), "pointercancel")];
    for (target, name) in release_targets {
        let game = game.clone();
        let release = Closure::wrap(Box::new(move |_e: Event| {
            game.borrow_mut().handle_input(&InputEvent::FocusLost, false);
        }) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(name, release.as_ref().unchecked_ref())?;
        release.forget();
    }

    // Context menu prevention
    {
        let contextmenu = Closure::wrap(Box::new(move |e: MouseEvent| {
            e.prevent_default();
        }) as Box<dyn FnMut(MouseEvent)>);
        canvas.add_event_listener_with_callback("contextmenu", contextmenu.as_ref().unchecked_ref())?;
        contextmenu.forget();
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn push_egui_event(queue: &Rc<RefCell<Vec<egui::Event>>>, event: &InputEvent) {
    let egui_event = match *event {
        InputEvent::PointerMoved { x, y } => egui::Event::PointerMoved(egui::pos2(x, y)),
        InputEvent::PointerButton { button: controller::MouseButton::Left, is_down, x, y } => {
            egui::Event::PointerButton {
                pos: egui::pos2(x, y),
                button: egui::PointerButton::Primary,
                pressed: is_down,
                modifiers: egui::Modifiers::default(),
            }
        }
        _ => return,
    };
    queue.borrow_mut().push(egui_event);
}

#[cfg(target_arch = "wasm32")]
fn init_canvas(width: u32, height: u32) -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
    let window = web_sys::window().ok_or_else(|| js_error("no global `window`"))?;
    let document = window.document().ok_or_else(|| js_error("no document on window"))?;
    let body = document.body().ok_or_else(|| js_error("no body on document"))?;
    let canvas_el = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| js_error("failed to create canvas"))?;
    canvas_el.set_width(width);
    canvas_el.set_height(height);
    // Keep touch drags from scrolling the page
    canvas_el.set_attribute("style", "touch-action: none; display: block;")?;
    body.append_child(&canvas_el)?;
    Ok((window, document, canvas_el))
}

#[cfg(target_arch = "wasm32")]
fn js_error<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Call `frame` on every `requestAnimationFrame` for the life of the page
#[cfg(target_arch = "wasm32")]
fn run_animation_frames(window: Window, mut frame: impl FnMut() + 'static) {
    let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
    let callback_clone = callback.clone();
    let window_clone = window.clone();

    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame();

        // Recursively schedule next frame
        if let Some(cb) = callback_clone.borrow().as_ref() {
            if let Err(e) = window_clone.request_animation_frame(cb.as_ref().unchecked_ref()) {
                tracing::error!("requestAnimationFrame failed: {e:?}");
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(cb) = callback.borrow().as_ref() {
        if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            tracing::error!("requestAnimationFrame start failed: {e:?}");
        }
    }

    // Leak the closure to keep it alive
    std::mem::forget(callback);
}
