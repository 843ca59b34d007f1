// CONTROLLER: Input, spin logic, and update loop
pub mod input;
pub mod rotation;
pub mod game;
#[cfg(target_arch = "wasm32")]
pub mod frame_loop;

pub use input::{InputEvent, InputState, InputProcessor, ButtonBindings, ButtonTransition, MouseButton};
pub use rotation::{RotationController, SpinSettings, DragState};
pub use game::{GameState, FrameStats};
#[cfg(target_arch = "wasm32")]
pub use frame_loop::FrameLoopContext;
