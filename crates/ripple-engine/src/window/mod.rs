//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the session window, and wires them to the
//! GPU layer and the input subsystem.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, WindowMode};
