use std::collections::HashMap;
use std::time::Instant;

use crate::coords::{Vec2, Viewport};

use super::types::{
    InputEvent, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent, TouchEvent,
    TouchPhase,
};

/// Maximum travel, in logical pixels, between press and release for a tap.
pub const DEFAULT_TAP_SLOP: f32 = 12.0;

/// A recognized tap.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tap {
    /// Release position in logical pixels (top-left origin).
    pub position: Vec2,

    /// Release position in UV space (bottom-left origin, `[0, 1]`).
    pub uv: Vec2,

    /// When the release event was received.
    pub at: Instant,
}

impl Tap {
    /// Normalizes `position` against `viewport`. `None` if the viewport is degenerate.
    pub fn new(position: Vec2, viewport: Viewport, at: Instant) -> Option<Self> {
        let uv = viewport.normalize(position)?;
        Some(Self { position, uv, at })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
enum Contact {
    Mouse,
    Finger(u64),
}

/// Turns press/release pairs into taps.
///
/// A contact (left mouse button or a finger) becomes a tap when it is released
/// within `slop` logical pixels of where it went down. Moving further cancels
/// it, as does a cancelled touch, the pointer leaving the window, or focus loss.
#[derive(Debug)]
pub struct TapRecognizer {
    slop: f32,
    down: HashMap<Contact, Vec2>,
}

impl TapRecognizer {
    pub fn new(slop: f32) -> Self {
        Self {
            slop: slop.max(0.0),
            down: HashMap::new(),
        }
    }

    pub fn reset(&mut self) {
        self.down.clear();
    }

    /// Feeds one event; returns the tap position (logical px) when it completes a tap.
    pub fn on_event(&mut self, ev: &InputEvent) -> Option<Vec2> {
        match ev {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x,
                y,
                ..
            }) => {
                let pos = Vec2::new(*x, *y);
                match state {
                    MouseButtonState::Pressed => self.press(Contact::Mouse, pos),
                    MouseButtonState::Released => self.release(Contact::Mouse, pos),
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.travel(Contact::Mouse, Vec2::new(*x, *y));
                None
            }

            InputEvent::Touch(TouchEvent { id, phase, x, y }) => {
                let contact = Contact::Finger(*id);
                let pos = Vec2::new(*x, *y);
                match phase {
                    TouchPhase::Started => self.press(contact, pos),
                    TouchPhase::Moved => {
                        self.travel(contact, pos);
                        None
                    }
                    TouchPhase::Ended => self.release(contact, pos),
                    TouchPhase::Cancelled => {
                        self.down.remove(&contact);
                        None
                    }
                }
            }

            InputEvent::PointerLeft => {
                self.down.remove(&Contact::Mouse);
                None
            }

            InputEvent::Focused(false) => {
                self.reset();
                None
            }

            _ => None,
        }
    }

    fn press(&mut self, contact: Contact, pos: Vec2) -> Option<Vec2> {
        self.down.insert(contact, pos);
        None
    }

    fn travel(&mut self, contact: Contact, pos: Vec2) {
        let moved_too_far = self
            .down
            .get(&contact)
            .is_some_and(|start| start.distance(pos) > self.slop);

        if moved_too_far {
            self.down.remove(&contact);
        }
    }

    fn release(&mut self, contact: Contact, pos: Vec2) -> Option<Vec2> {
        let start = self.down.remove(&contact)?;
        (start.distance(pos) <= self.slop).then_some(pos)
    }
}

impl Default for TapRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_TAP_SLOP)
    }
}
