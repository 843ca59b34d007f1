//! Platform-agnostic pointer input
use std::collections::{HashMap, HashSet};
use glam::Vec2;

/// Platform-independent input events. Positions are viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },
    PointerButton { button: MouseButton, is_down: bool, x: f32, y: f32 },
    FocusLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

impl MouseButton {
    pub fn from_web_button(button: i16) -> Self {
        match button {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            n => MouseButton::Other(n.max(0) as u16),
        }
    }
}

/// Press or release of a bound button
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ButtonTransition {
    Pressed(Vec2),
    Released,
}

/// Where the pointer is and which buttons are held
pub struct InputState {
    pub cursor_pos: Vec2,
    pub held: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            cursor_pos: Vec2::ZERO,
            held: HashSet::new(),
        }
    }

    pub fn is_held(&self, button: MouseButton) -> bool {
        self.held.contains(&button)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Named buttons mapped to physical ones
#[derive(Debug, Clone)]
pub struct ButtonBindings {
    buttons: HashMap<String, MouseButton>,
}

impl ButtonBindings {
    pub const TOUCH: &'static str = "Touch";

    pub fn empty() -> Self {
        Self { buttons: HashMap::new() }
    }

    pub fn bind(&mut self, name: &str, button: MouseButton) {
        self.buttons.insert(name.to_string(), button);
    }

    pub fn get(&self, name: &str) -> Option<MouseButton> {
        self.buttons.get(name).copied()
    }
}

impl Default for ButtonBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind(Self::TOUCH, MouseButton::Left);
        bindings
    }
}

/// Tracks raw events and reports transitions of one named button
#[derive(Debug, Clone)]
pub struct InputProcessor {
    bindings: ButtonBindings,
    action: String,
}

impl InputProcessor {
    pub fn new(bindings: ButtonBindings, action: &str) -> Self {
        Self { bindings, action: action.to_string() }
    }

    /// Update `state` with `event`. Returns a transition when the bound button
    /// goes down, or comes up after having been down.
    pub fn process(&self, state: &mut InputState, event: &InputEvent) -> Option<ButtonTransition> {
        let bound = self.bindings.get(&self.action);
        match *event {
            InputEvent::PointerMoved { x, y } => {
                state.cursor_pos = Vec2::new(x, y);
                None
            }
            InputEvent::PointerButton { button, is_down, x, y } => {
                state.cursor_pos = Vec2::new(x, y);
                let was_held = if is_down {
                    !state.held.insert(button)
                } else {
                    state.held.remove(&button)
                };
                if Some(button) != bound {
                    return None;
                }
                match (is_down, was_held) {
                    (true, _) => Some(ButtonTransition::Pressed(state.cursor_pos)),
                    (false, true) => Some(ButtonTransition::Released),
                    (false, false) => None,
                }
            }
            InputEvent::FocusLost => {
                let released = bound.is_some_and(|b| state.held.contains(&b));
                state.held.clear();
                released.then_some(ButtonTransition::Released)
            }
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new(ButtonBindings::default(), ButtonBindings::TOUCH)
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    /// Client coordinates relative to the canvas' top-left corner
    fn canvas_position(e: &MouseEvent, canvas: &HtmlCanvasElement) -> (f32, f32) {
        let rect = canvas.get_bounding_client_rect();
        (
            (e.client_x() as f64 - rect.left()) as f32,
            (e.client_y() as f64 - rect.top()) as f32,
        )
    }

    pub fn pointer_move_to_input(e: &MouseEvent, canvas: &HtmlCanvasElement) -> InputEvent {
        let (x, y) = canvas_position(e, canvas);
        InputEvent::PointerMoved { x, y }
    }

    pub fn pointer_button_to_input(e: &MouseEvent, canvas: &HtmlCanvasElement, is_down: bool) -> InputEvent {
        let (x, y) = canvas_position(e, canvas);
        InputEvent::PointerButton {
            button: MouseButton::from_web_button(e.button()),
            is_down,
            x,
            y,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod native {
    use super::*;
    use winit::event::{ElementState, MouseButton as WinitButton};

    pub fn mouse_button(button: WinitButton) -> MouseButton {
        match button {
            WinitButton::Left => MouseButton::Left,
            WinitButton::Right => MouseButton::Right,
            WinitButton::Middle => MouseButton::Middle,
            WinitButton::Back => MouseButton::Other(3),
            WinitButton::Forward => MouseButton::Other(4),
            WinitButton::Other(n) => MouseButton::Other(n),
        }
    }

    pub fn mouse_input_to_input(state: ElementState, button: WinitButton, cursor: Vec2) -> InputEvent {
        InputEvent::PointerButton {
            button: mouse_button(button),
            is_down: state == ElementState::Pressed,
            x: cursor.x,
            y: cursor.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(button: MouseButton, is_down: bool, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton { button, is_down, x, y }
    }

    #[test]
    fn test_touch_is_bound_to_left_button() {
        let processor = InputProcessor::default();
        let mut state = InputState::new();

        let down = processor.process(&mut state, &button(MouseButton::Left, true, 10.0, 20.0));
        assert_eq!(down, Some(ButtonTransition::Pressed(Vec2::new(10.0, 20.0))));
        assert!(state.is_held(MouseButton::Left));

        let up = processor.process(&mut state, &button(MouseButton::Left, false, 11.0, 21.0));
        assert_eq!(up, Some(ButtonTransition::Released));
        assert_eq!(state.cursor_pos, Vec2::new(11.0, 21.0));
    }

    #[test]
    fn test_other_buttons_are_ignored() {
        let processor = InputProcessor::default();
        let mut state = InputState::new();

        assert_eq!(processor.process(&mut state, &button(MouseButton::Right, true, 0.0, 0.0)), None);
        assert_eq!(processor.process(&mut state, &button(MouseButton::Right, false, 0.0, 0.0)), None);
    }

    #[test]
    fn test_release_without_press_is_dropped() {
        let processor = InputProcessor::default();
        let mut state = InputState::new();

        assert_eq!(processor.process(&mut state, &button(MouseButton::Left, false, 0.0, 0.0)), None);
    }

    #[test]
    fn test_focus_loss_releases_held_touch() {
        let processor = InputProcessor::default();
        let mut state = InputState::new();

        processor.process(&mut state, &button(MouseButton::Left, true, 0.0, 0.0));
        assert_eq!(processor.process(&mut state, &InputEvent::FocusLost), Some(ButtonTransition::Released));
        assert!(state.held.is_empty());
        assert_eq!(processor.process(&mut state, &InputEvent::FocusLost), None);
    }

    #[test]
    fn test_pointer_moves_update_cursor() {
        let processor = InputProcessor::default();
        let mut state = InputState::new();

        assert_eq!(processor.process(&mut state, &InputEvent::PointerMoved { x: 3.0, y: 4.0 }), None);
        assert_eq!(state.cursor_pos, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_rebinding_touch() {
        let mut bindings = ButtonBindings::empty();
        bindings.bind(ButtonBindings::TOUCH, MouseButton::Right);
        let processor = InputProcessor::new(bindings, ButtonBindings::TOUCH);
        let mut state = InputState::new();

        assert_eq!(processor.process(&mut state, &button(MouseButton::Left, true, 0.0, 0.0)), None);
        assert!(processor.process(&mut state, &button(MouseButton::Right, true, 0.0, 0.0)).is_some());
    }

    #[test]
    fn test_web_button_codes() {
        assert_eq!(MouseButton::from_web_button(0), MouseButton::Left);
        assert_eq!(MouseButton::from_web_button(2), MouseButton::Right);
        assert_eq!(MouseButton::from_web_button(4), MouseButton::Other(4));
    }
}
