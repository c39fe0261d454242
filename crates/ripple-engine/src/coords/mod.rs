//! Coordinate types shared by input and rendering.
//!
//! Two spaces are in use:
//! - logical pixels: origin top-left, +X right, +Y down (window/input space)
//! - UV: origin bottom-left, each axis in `[0, 1]` (texture/shader space)
//!
//! `Viewport::normalize` converts from the first to the second.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
