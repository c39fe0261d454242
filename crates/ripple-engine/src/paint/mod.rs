//! Colors used by the render passes.

pub mod color;

pub use color::Color;
