//! Ripple engine crate.
//!
//! Tap-driven ripple distortion over a background image: the `ripple` store
//! plus the platform and GPU runtime pieces that feed it and draw it.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod ripple;
