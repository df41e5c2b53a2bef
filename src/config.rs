//! Client and writer configuration.
//!
//! Defaults suit a diary server on localhost; each value can be overridden
//! from the environment with [`ClientConfig::from_env`] / [`WriterConfig::from_env`].

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SectorError};

/// Base URL of the diary server
pub const ENV_API_URL: &str = "SECTOR_API_URL";
/// Request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "SECTOR_API_TIMEOUT_SECS";
/// Writer quiet period in milliseconds
pub const ENV_PAUSE_MS: &str = "SECTOR_WRITER_PAUSE_MS";

/// Quiet period before queued statistics are written.
pub const DEFAULT_PAUSE_MS: u64 = 1000;

/// Configuration for [`crate::api::SectorClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root, without a trailing slash
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `SECTOR_API_URL` and `SECTOR_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENV_API_URL) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = env_u64(ENV_TIMEOUT_SECS)? {
            config.timeout_secs = secs;
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute URL for an API path such as `/api/sector/3`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Configuration for [`crate::writer::StatisticsWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WriterConfig {
    pub pause_ms: u64,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            pause_ms: DEFAULT_PAUSE_MS,
        }
    }
}

impl WriterConfig {
    /// Defaults overridden by `SECTOR_WRITER_PAUSE_MS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(ms) = env_u64(ENV_PAUSE_MS)? {
            config.pause_ms = ms;
        }
        Ok(config)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| SectorError::ConfigError {
                message: format!("{}='{}': {}", name, raw, e),
            }),
        Err(_) => Ok(None),
    }
}
