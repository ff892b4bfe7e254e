//! PLC modem chat link
//!
//! This library lets a host application exchange short text messages with a
//! remote peer over a power-line-communication modem attached via USB serial.
//! All port access is serialized through a single background worker thread
//! that pulls jobs from a FIFO queue, applies a bounded retry protocol, and
//! reports outcomes over an asynchronous notification channel.
//!
//! # Modules
//!
//! - `config`: TOML configuration with environment variable overrides
//! - `port`: serial link abstraction (real hardware, mock, discovery)
//! - `protocol`: status tokens emitted by the modem firmware
//! - `session`: the single-owner port session with line primitives
//! - `worker`: the job queue, worker thread, and notification channel

pub mod config;
pub mod port;
pub mod protocol;
pub mod session;
pub mod worker;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, LoggingConfig, SerialConfig};
pub use port::{LinkError, LinkSettings, MockLink, SerialLink, UsbSerialLink};
pub use protocol::StatusToken;
pub use session::{PortSession, ReadOutcome};
pub use worker::{Job, Notification, Worker, WorkerGone, WorkerHandle, WorkerSettings};
