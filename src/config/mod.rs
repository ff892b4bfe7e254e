//! Configuration for plc-chat.
//!
//! TOML-based configuration with environment variable overrides.
//!
//! # Resolution order
//!
//! 1. `PLC_CHAT_CONFIG` environment variable (explicit path)
//! 2. `./plc-chat.toml` (current directory)
//! 3. `~/.config/plc-chat/config.toml` (platform config dir)
//! 4. Built-in defaults (no file required)
//!
//! # Environment overrides
//!
//! - `PLC_CHAT_SERIAL_DEFAULT_BAUD`
//! - `PLC_CHAT_SERIAL_RETRY_ATTEMPTS`
//! - `PLC_CHAT_LOG_LEVEL`

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load, load_from, resolve_config_path};
pub use schema::{Config, LogFormat, LoggingConfig, SerialConfig};
