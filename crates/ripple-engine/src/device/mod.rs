//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Adapter/Device/Queue and the window Surface
//! - acquiring frames and providing encoders/views for rendering
//! - decoding and uploading the background texture

mod context;
mod error;
mod frame;
mod init;
mod surface;
mod texture;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
pub use image::RgbaImage;
pub use texture::{BackgroundImage, create_nearest_sampler};
