use super::tap::TapRecognizer;
use super::types::{InputAction, InputEvent, KeyState, PointerButtonEvent, PointerMoveEvent};

/// Current input state for the session window.
///
/// Tracks the pointer (winit reports button presses without a position) and
/// feeds every event to the tap recognizer.
#[derive(Debug, Default)]
pub struct InputState {
    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    taps: TapRecognizer,
}

impl InputState {
    /// Creates a state whose tap recognizer uses `slop` logical pixels.
    pub fn with_tap_slop(slop: f32) -> Self {
        Self {
            taps: TapRecognizer::new(slop),
            ..Self::default()
        }
    }

    /// Applies an event and returns what it means to the session, if anything:
    /// a fresh key press or a completed tap.
    pub fn apply_event(&mut self, ev: InputEvent) -> Option<InputAction> {
        match &ev {
            InputEvent::PointerMoved(PointerMoveEvent { x, y })
            | InputEvent::PointerButton(PointerButtonEvent { x, y, .. }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key {
                key,
                state: KeyState::Pressed,
                repeat: false,
            } => return Some(InputAction::KeyPressed(*key)),

            _ => {}
        }

        self.taps.on_event(&ev).map(InputAction::Tap)
    }
}
