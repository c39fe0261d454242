use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::input::{Key, Tap};

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    /// Switch between windowed and borderless fullscreen.
    ToggleFullscreen,
    Exit,
}

/// Application contract implemented by the session.
///
/// All callbacks run on the event-loop thread, between frames.
pub trait App {
    /// Called for raw window events, before input translation.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called when a tap completes.
    fn on_tap(&mut self, window_id: WindowId, tap: Tap) -> AppControl {
        let _ = (window_id, tap);
        AppControl::Continue
    }

    /// Called on key press. Auto-repeats are filtered out.
    fn on_key(&mut self, window_id: WindowId, key: Key) -> AppControl {
        let _ = (window_id, key);
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
