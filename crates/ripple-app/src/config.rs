use std::path::PathBuf;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use ripple_engine::paint::Color;
use ripple_engine::ripple::DEFAULT_TIME_TO_DIE;
use ripple_engine::window::{RuntimeConfig, WindowMode};

pub const DEFAULT_BACKGROUND: &str = "assets/background.png";

pub const ENV_BACKGROUND: &str = "RIPPLE_BACKGROUND";
pub const ENV_TIME_TO_DIE: &str = "RIPPLE_TIME_TO_DIE";
pub const ENV_WINDOWED: &str = "RIPPLE_WINDOWED";
pub const ENV_FLIP_BACKGROUND: &str = "RIPPLE_FLIP_BACKGROUND";

/// Settings for one ripple session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Seconds a ripple lives.
    pub time_to_die: f32,
    pub background: PathBuf,
    pub flip_background: bool,
    pub clear: Color,
    pub mode: WindowMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_to_die: DEFAULT_TIME_TO_DIE,
            background: PathBuf::from(DEFAULT_BACKGROUND),
            flip_background: false,
            clear: Color::CORNFLOWER_BLUE,
            mode: WindowMode::Fullscreen,
        }
    }
}

impl SessionConfig {
    /// Reads the first command-line argument and `RIPPLE_*` variables.
    pub fn from_env() -> Result<Self> {
        Self::from_sources(std::env::args().nth(1), |name| std::env::var(name).ok())
    }

    /// Builds a config from an optional background argument and a variable lookup.
    ///
    /// The argument takes precedence over `RIPPLE_BACKGROUND`.
    pub fn from_sources<F>(arg: Option<String>, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = arg.or_else(|| var(ENV_BACKGROUND)) {
            config.background = PathBuf::from(path);
        }

        if let Some(raw) = var(ENV_TIME_TO_DIE) {
            config.time_to_die = parse_time_to_die(&raw)
                .with_context(|| format!("invalid {ENV_TIME_TO_DIE}={raw:?}"))?;
        }

        if var(ENV_WINDOWED).is_some_and(|v| is_truthy(&v)) {
            config.mode = WindowMode::Windowed;
        }

        if var(ENV_FLIP_BACKGROUND).is_some_and(|v| is_truthy(&v)) {
            config.flip_background = true;
        }

        Ok(config)
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: "ripple".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            mode: self.mode,
            ..RuntimeConfig::default()
        }
    }
}

fn parse_time_to_die(raw: &str) -> Result<f32> {
    let value: f32 = raw.trim().parse().context("not a number")?;
    anyhow::ensure!(
        value.is_finite() && value > 0.0,
        "must be a positive number of seconds"
    );
    Ok(value)
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn from(arg: Option<&str>, vars: &[(&str, &str)]) -> Result<SessionConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SessionConfig::from_sources(arg.map(str::to_string), |name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_overrides() {
        let config = from(None, &[]).unwrap();
        assert_eq!(config, SessionConfig::default());
        assert_relative_eq!(config.time_to_die, 10.0);
        assert_eq!(config.background, PathBuf::from("assets/background.png"));
        assert_eq!(config.mode, WindowMode::Fullscreen);
    }

    #[test]
    fn argument_beats_environment_for_background() {
        let config = from(Some("cli.png"), &[(ENV_BACKGROUND, "env.png")]).unwrap();
        assert_eq!(config.background, PathBuf::from("cli.png"));

        let config = from(None, &[(ENV_BACKGROUND, "env.png")]).unwrap();
        assert_eq!(config.background, PathBuf::from("env.png"));
    }

    #[test]
    fn time_to_die_override() {
        let config = from(None, &[(ENV_TIME_TO_DIE, " 2.5 ")]).unwrap();
        assert_relative_eq!(config.time_to_die, 2.5);
    }

    #[test]
    fn bad_time_to_die_is_an_error() {
        assert!(from(None, &[(ENV_TIME_TO_DIE, "soon")]).is_err());
        assert!(from(None, &[(ENV_TIME_TO_DIE, "0")]).is_err());
        assert!(from(None, &[(ENV_TIME_TO_DIE, "-3")]).is_err());
        assert!(from(None, &[(ENV_TIME_TO_DIE, "inf")]).is_err());
    }

    #[test]
    fn flags_accept_common_spellings() {
        let config = from(None, &[(ENV_WINDOWED, "TRUE"), (ENV_FLIP_BACKGROUND, "1")]).unwrap();
        assert_eq!(config.mode, WindowMode::Windowed);
        assert!(config.flip_background);

        let config = from(None, &[(ENV_WINDOWED, "0")]).unwrap();
        assert_eq!(config.mode, WindowMode::Fullscreen);
    }

    #[test]
    fn runtime_config_carries_mode() {
        let config = SessionConfig {
            mode: WindowMode::Windowed,
            ..SessionConfig::default()
        };
        assert_eq!(config.runtime_config().mode, WindowMode::Windowed);
    }
}
