//! Ripple lifecycle and the per-frame parameter feed.
//!
//! `RippleStore` owns the live ripples. Once per frame the runtime calls
//! `update_and_export_at(frame_time.now)`, which ages and prunes the set and
//! returns an `ExportBlock` whose logical layout is
//!
//! ```text
//! [count: f32][age: f32, origin.x: f32, origin.y: f32] * max(count, 1)[time_to_die: f32]
//! ```
//!
//! The block never carries zero records: an empty set exports one zeroed
//! placeholder while `count` stays 0.

mod export;
mod store;

pub use export::{
    ExportBlock, LifetimeUniform, RippleRecord, PLACEHOLDER_RECORD, RIPPLE_RECORD_SIZE,
    RIPPLE_SET_HEADER_SIZE, RIPPLE_SET_MIN_SIZE,
};
pub use store::{RippleStore, DEFAULT_TIME_TO_DIE};
