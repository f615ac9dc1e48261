//! Configuration for the sync client.

use rally_engine::DEFAULT_DEBOUNCE_WINDOW_MS;
use std::env;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Quiescence window for debounced cart writes, in milliseconds
    pub debounce_window_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let debounce_window_ms = match env::var("RALLY_DEBOUNCE_MS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidDebounceWindow)?,
            Err(_) => DEFAULT_DEBOUNCE_WINDOW_MS,
        };

        Ok(Self { debounce_window_ms })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_window_ms: DEFAULT_DEBOUNCE_WINDOW_MS,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid RALLY_DEBOUNCE_MS value")]
    InvalidDebounceWindow,
}
