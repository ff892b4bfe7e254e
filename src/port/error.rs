//! Link-level error types.
//!
//! Connection errors (the device is missing or busy) are distinct from
//! transport errors (a fault on an open link); the worker resets the session
//! on the former and only aborts the current job on the latter.

use thiserror::Error;

/// Errors raised by serial link operations.
#[derive(Debug, Error)]
pub enum LinkError {
    /// The requested device does not exist on this host.
    #[error("serial port not found: {0}")]
    NotFound(String),

    /// The device exists but could not be claimed (permissions, in use).
    #[error("serial port busy or inaccessible: {0}")]
    Busy(String),

    /// An operation was attempted with no link attached.
    #[error("no serial port is open")]
    NotOpen,

    /// An I/O fault on an open link.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialport-specific fault.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl LinkError {
    /// Whether this error means the session should be torn down and the
    /// user asked to choose another port.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, LinkError::NotFound(_) | LinkError::Busy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = LinkError::NotFound("/dev/ttyACM0".into());
        assert_eq!(err.to_string(), "serial port not found: /dev/ttyACM0");
        assert_eq!(LinkError::NotOpen.to_string(), "no serial port is open");
    }

    #[test]
    fn connection_errors_are_classified() {
        assert!(LinkError::NotFound("x".into()).is_connection_error());
        assert!(LinkError::Busy("x".into()).is_connection_error());
        assert!(!LinkError::NotOpen.is_connection_error());
        let io = LinkError::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "t"));
        assert!(!io.is_connection_error());
    }
}
