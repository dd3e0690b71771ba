//! Host configuration loaded from `REELBOARD_*` environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_WIDTH: f64 = 1280.0;
const DEFAULT_HEIGHT: f64 = 720.0;
const DEFAULT_FPS: f64 = 30.0;
const DEFAULT_SECONDS: f64 = 5.0;
const DEFAULT_AUTOPLAY: bool = true;
const DEFAULT_AUTHOR: &str = "reelboard";

/// Error raised when an environment variable holds an unusable value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an unparseable value: {value:?}")]
    Invalid { var: String, value: String },
    #[error("{var} must be positive, got {value}")]
    NonPositive { var: String, value: f64 },
}

/// Settings for the headless frame driver.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    /// Container size in pixels.
    pub width: f64,
    pub height: f64,
    /// Frame driver rate.
    pub fps: f64,
    /// How long the driver runs before shutting down.
    pub seconds: f64,
    /// JSON snapshot to load instead of the demo board.
    pub snapshot: Option<PathBuf>,
    /// Start every monitor at launch.
    pub autoplay: bool,
    pub author: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            seconds: DEFAULT_SECONDS,
            snapshot: None,
            autoplay: DEFAULT_AUTOPLAY,
            author: DEFAULT_AUTHOR.to_owned(),
        }
    }
}

impl HostConfig {
    /// Read the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a numeric or boolean variable does not
    /// parse, or a size or rate is not positive.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(_) => None,
        })
    }

    /// Build from any key lookup; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// See [`HostConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            width: positive(&lookup, "REELBOARD_WIDTH", DEFAULT_WIDTH)?,
            height: positive(&lookup, "REELBOARD_HEIGHT", DEFAULT_HEIGHT)?,
            fps: positive(&lookup, "REELBOARD_FPS", DEFAULT_FPS)?,
            seconds: env_parse(&lookup, "REELBOARD_SECONDS", DEFAULT_SECONDS)?.max(0.0),
            snapshot: lookup("REELBOARD_SNAPSHOT").filter(|s| !s.is_empty()).map(PathBuf::from),
            autoplay: env_parse(&lookup, "REELBOARD_AUTOPLAY", DEFAULT_AUTOPLAY)?,
            author: lookup("REELBOARD_AUTHOR").unwrap_or_else(|| DEFAULT_AUTHOR.to_owned()),
        };
        Ok(config)
    }
}

fn env_parse<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { var: key.to_owned(), value: raw })
}

fn positive<F>(lookup: &F, key: &str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = env_parse(lookup, key, default)?;
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { var: key.to_owned(), value })
    }
}
