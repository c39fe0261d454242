//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code is responsible for translating platform events into `InputEvent`s.
//! Taps (left click or single finger, released in place) are recognized here.

mod state;
mod tap;
mod types;

pub mod platform;

pub use state::InputState;
pub use tap::{DEFAULT_TAP_SLOP, Tap, TapRecognizer};
pub use types::{
    InputAction,
    InputEvent,
    Key,
    KeyState,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
    TouchEvent,
    TouchPhase,
};
