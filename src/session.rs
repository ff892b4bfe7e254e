//! The single-owner port session.
//!
//! Wraps at most one open serial link and exposes the blocking line
//! primitives the worker builds on. All reads and writes go through this
//! one owner; the worker thread is the only code that touches a live
//! session.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::port::{LinkError, LinkSettings, SerialLink, UsbSerialLink};

/// Result of a bounded line read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line arrived; the terminator has been stripped.
    Line(String),
    /// Nothing arrived within the timeout. Distinct from a transport error.
    NoMessage,
}

/// A serial connection to the modem, created empty and opened when the user
/// picks a port. At most one link is live at a time.
#[derive(Debug, Default)]
pub struct PortSession {
    link: Option<Box<dyn SerialLink>>,
    /// Bytes read past the previous line terminator, carried to the next read.
    carry: Vec<u8>,
}

impl PortSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the device at `path`. Fails if a link is already attached or the
    /// device cannot be claimed.
    pub fn open(&mut self, path: &str, baud_rate: u32) -> Result<(), LinkError> {
        if self.link.is_some() {
            return Err(LinkError::Busy(path.to_string()));
        }
        let settings = LinkSettings {
            baud_rate,
            ..LinkSettings::default()
        };
        let link = UsbSerialLink::open(path, settings)?;
        debug!(path, baud_rate, "serial session opened");
        self.link = Some(Box::new(link));
        Ok(())
    }

    /// Attach an already-constructed link. Replaces any previous link; used
    /// for dependency injection in tests.
    pub fn attach(&mut self, link: Box<dyn SerialLink>) {
        debug!(name = link.name(), "link attached to session");
        self.carry.clear();
        self.link = Some(link);
    }

    /// Release the link. Idempotent; safe to call when not open.
    pub fn close(&mut self) {
        if let Some(link) = self.link.take() {
            debug!(name = link.name(), "serial session closed");
        }
        self.carry.clear();
    }

    pub fn is_open(&self) -> bool {
        self.link.is_some()
    }

    /// The device identifier of the open link, if any.
    pub fn name(&self) -> Option<&str> {
        self.link.as_deref().map(SerialLink::name)
    }

    /// Write one text line. A newline is appended when absent.
    pub fn write_line(&mut self, text: &str) -> Result<(), LinkError> {
        let link = self.link.as_mut().ok_or(LinkError::NotOpen)?;
        let mut bytes = text.as_bytes().to_vec();
        if !bytes.ends_with(b"\n") {
            bytes.push(b'\n');
        }
        trace!(len = bytes.len(), "writing line");
        link.write_bytes(&bytes)
    }

    /// Block up to `timeout` for a newline-terminated line.
    ///
    /// A timeout with no bytes buffered yields [`ReadOutcome::NoMessage`];
    /// a timeout with a partial line yields the partial text. Transport
    /// errors are propagated and leave any partial bytes buffered.
    pub fn read_line(&mut self, timeout: Duration) -> Result<ReadOutcome, LinkError> {
        let link = self.link.as_mut().ok_or(LinkError::NotOpen)?;
        let deadline = Instant::now() + timeout;
        let mut chunk = [0u8; 256];

        loop {
            if let Some(pos) = self.carry.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.carry.drain(..=pos).collect();
                return Ok(ReadOutcome::Line(decode_line(&line)));
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            link.set_timeout(remaining)?;

            match link.read_bytes(&mut chunk) {
                Ok(n) => self.carry.extend_from_slice(&chunk[..n]),
                Err(LinkError::Io(e)) if is_timeout(&e) => break,
                Err(e) => return Err(e),
            }
        }

        if self.carry.is_empty() {
            Ok(ReadOutcome::NoMessage)
        } else {
            // Deadline hit mid-line: surface what arrived.
            let partial: Vec<u8> = self.carry.drain(..).collect();
            Ok(ReadOutcome::Line(decode_line(&partial)))
        }
    }
}

fn is_timeout(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
    )
}

fn decode_line(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.trim_end_matches(['\r', '\n']).to_string()
}
