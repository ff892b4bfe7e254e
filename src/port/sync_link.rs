//! Real serial port implementation backed by the `serialport` crate.

use std::io::{Read, Write};
use std::time::Duration;

use super::error::LinkError;
use super::traits::{LinkSettings, SerialLink};

/// A USB serial link wrapping `serialport::SerialPort`.
pub struct UsbSerialLink {
    port: Box<dyn serialport::SerialPort>,
    name: String,
}

impl UsbSerialLink {
    /// Open the device at `path` with the given settings (8N1, no flow
    /// control, which is what the modem firmware expects).
    pub fn open(path: &str, settings: LinkSettings) -> Result<Self, LinkError> {
        let port = serialport::new(path, settings.baud_rate)
            .timeout(settings.timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice
                | serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => {
                    LinkError::NotFound(path.to_string())
                }
                serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
                    LinkError::Busy(path.to_string())
                }
                _ => LinkError::Serial(e),
            })?;

        Ok(Self {
            port,
            name: path.to_string(),
        })
    }
}

impl SerialLink for UsbSerialLink {
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.port.write_all(data).map_err(LinkError::Io)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, LinkError> {
        self.port.read(buffer).map_err(LinkError::Io)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), LinkError> {
        self.port.set_timeout(timeout).map_err(LinkError::Serial)
    }
}

impl std::fmt::Debug for UsbSerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsbSerialLink")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate().ok())
            .finish()
    }
}
