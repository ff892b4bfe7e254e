//! The `SerialLink` trait and link settings.

use std::time::Duration;

use super::error::LinkError;

/// Baud rate the PLC modem firmware runs its USB serial side at.
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

/// Settings for opening a serial link. The modem speaks 8N1 at a fixed
/// rate, so only the rate and the read timeout are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSettings {
    /// Baud rate (bits per second).
    pub baud_rate: u32,
    /// Initial byte read timeout.
    pub timeout: Duration,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_millis(50),
        }
    }
}

/// Blocking byte transport over a serial device.
///
/// Abstracts over real hardware and mock implementations so the worker can
/// be tested without a modem attached.
pub trait SerialLink: Send + std::fmt::Debug {
    /// Write all of `data` to the link.
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), LinkError>;

    /// Read available bytes into `buffer`, blocking up to the configured
    /// timeout. Returns the number of bytes read; a timeout surfaces as an
    /// `Io` error with kind `TimedOut` (or `WouldBlock`), never as `Ok(0)`.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, LinkError>;

    /// The device path or identifier of this link.
    fn name(&self) -> &str;

    /// Adjust the byte read timeout.
    fn set_timeout(&mut self, timeout: Duration) -> Result<(), LinkError>;
}
