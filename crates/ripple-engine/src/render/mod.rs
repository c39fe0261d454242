//! GPU rendering subsystem.
//!
//! One full-screen pass: a procedural triangle samples the background texture,
//! displaced by the ripples exported for the frame.
//!
//! Convention:
//! - Ripple origins and fragment UVs use a bottom-left origin in `[0, 1]`.
//! - The resolution uniform is in physical pixels.

mod ctx;
mod ripple_pass;

pub use ctx::{RenderCtx, RenderTarget};
pub use ripple_pass::{INITIAL_RIPPLE_CAPACITY, RipplePass};
