//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the session: tap and key callbacks plus an explicit per-frame context
//! carrying the GPU handles and frame time.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;

pub(crate) use ctx::logical_viewport;
