//! Configuration schema.
//!
//! All sections deserialize with defaults, so a partial (or absent) file is
//! always valid.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::port::DEFAULT_BAUD_RATE;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Serial link and worker tuning.
    pub serial: SerialConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Serial section: link parameters plus the worker's protocol knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SerialConfig {
    /// Device to open at startup; when unset the user picks at runtime.
    pub port: Option<String>,
    /// Baud rate for new links.
    pub default_baud: u32,
    /// How long a send job waits for each response read, in milliseconds.
    pub send_timeout_ms: u64,
    /// Worker queue wait between iterations while a session is open.
    pub poll_interval_ms: u64,
    /// Timeout for each opportunistic receive.
    pub receive_timeout_ms: u64,
    /// Reads attempted per send job before reporting no response.
    pub retry_attempts: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            default_baud: DEFAULT_BAUD_RATE,
            send_timeout_ms: 1000,
            poll_interval_ms: 50,
            receive_timeout_ms: 50,
            retry_attempts: 5,
        }
    }
}

impl SerialConfig {
    /// Send-job read timeout as a Duration.
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable with colors.
    Pretty,
    /// Single-line compact output.
    Compact,
}
