//! Frame timing.
//!
//! One `FrameClock` per window; `tick()` once per presented frame. The
//! resulting `FrameTime::now` is the timestamp ripples are aged against.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
