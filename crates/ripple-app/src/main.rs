mod config;
mod session;

use anyhow::{Context, Result};

use ripple_engine::device::{BackgroundImage, GpuInit};
use ripple_engine::logging::{LoggingConfig, init_logging};
use ripple_engine::window::Runtime;

use crate::config::SessionConfig;
use crate::session::RippleSession;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = SessionConfig::from_env().context("invalid session configuration")?;
    log::info!(
        "starting ripple session (time_to_die {}s, {:?})",
        config.time_to_die,
        config.mode
    );

    let background = BackgroundImage::open(&config.background, config.flip_background)?;
    let session = RippleSession::new(&config, background);

    Runtime::run(config.runtime_config(), GpuInit::default(), session)
}
