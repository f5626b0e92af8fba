//! # Poll Configuration
//!
//! Pollers tick at a fixed interval. The default matches the storefront's reference behaviour
//! (3 seconds); callers override it in code, from a deserialised options object, or from the
//! environment.

use crate::error::SyncError;
use serde::Deserialize;
use std::time::Duration;

/// Default tick period in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 3000;

/// Environment variable read by [`PollConfig::from_env`].
pub const INTERVAL_ENV: &str = "ORDER_SYNC_INTERVAL_MS";

/// Recognised poll options as they arrive from a caller or a config file.
///
/// ```rust
/// use status_sync::PollOptions;
///
/// let options: PollOptions = serde_json::from_str(r#"{ "intervalMs": 500 }"#).unwrap();
/// assert_eq!(options.interval_ms, Some(500));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOptions {
    /// Overrides the default tick period.
    pub interval_ms: Option<u64>,
}

/// Validated poller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
        }
    }
}

impl PollConfig {
    /// Builds a config with the given tick period.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidConfig`] for a zero interval, which would make the
    /// timer spin.
    pub fn with_interval_ms(interval_ms: u64) -> Result<Self, SyncError> {
        if interval_ms == 0 {
            return Err(SyncError::InvalidConfig(
                "interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            interval: Duration::from_millis(interval_ms),
        })
    }

    /// Applies recognised options on top of the defaults.
    pub fn from_options(options: &PollOptions) -> Result<Self, SyncError> {
        match options.interval_ms {
            Some(ms) => Self::with_interval_ms(ms),
            None => Ok(Self::default()),
        }
    }

    /// Reads [`INTERVAL_ENV`]; an unset variable yields the default.
    pub fn from_env() -> Result<Self, SyncError> {
        Self::parse_interval(std::env::var(INTERVAL_ENV).ok().as_deref())
    }

    fn parse_interval(raw: Option<&str>) -> Result<Self, SyncError> {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(Self::default());
        };
        let ms = raw.parse::<u64>().map_err(|e| {
            SyncError::InvalidConfig(format!("{INTERVAL_ENV}={raw:?} is not a number: {e}"))
        })?;
        Self::with_interval_ms(ms)
    }

    /// The tick period.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
