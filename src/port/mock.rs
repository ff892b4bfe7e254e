//! Mock serial link for testing the worker without hardware.
//!
//! The mock is scripted in terms of whole reads: each write releases the
//! next queued reply batch, and every `read_bytes` call consumes one step
//! from the inbox. Unsolicited traffic can be injected directly. The mock is
//! cloneable so a test can keep a handle after attaching the link to the
//! worker.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::error::LinkError;
use super::traits::SerialLink;

/// One scripted outcome for a single `read_bytes` call.
#[derive(Debug, Clone)]
pub enum ReadStep {
    /// Deliver a full line (a newline is appended if missing).
    Line(Vec<u8>),
    /// Simulate a read timeout: nothing arrived within the deadline.
    Silence,
    /// Simulate a transport fault with the given message.
    Fault(String),
    /// Simulate the device vanishing mid-job: the read fails with a
    /// connection-class error instead of a transport fault.
    Lost,
}

impl ReadStep {
    /// A line step from text, newline-terminated.
    pub fn line(text: &str) -> Self {
        let mut bytes = text.as_bytes().to_vec();
        if !bytes.ends_with(b"\n") {
            bytes.push(b'\n');
        }
        ReadStep::Line(bytes)
    }
}

#[derive(Debug, Default)]
struct MockState {
    /// Reply batches, one released into the inbox per write.
    replies: VecDeque<Vec<ReadStep>>,
    /// Steps consumed by subsequent reads.
    inbox: VecDeque<ReadStep>,
    /// Log of everything written to the link.
    write_log: Vec<Vec<u8>>,
    /// If set, the next write fails with this message.
    fail_next_write: Option<String>,
    /// Total `read_bytes` calls observed.
    reads_attempted: usize,
    timeout: Duration,
}

/// Scripted serial link.
#[derive(Debug, Clone)]
pub struct MockLink {
    name: String,
    state: Arc<Mutex<MockState>>,
}

impl MockLink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockState {
                timeout: Duration::from_millis(50),
                ..Default::default()
            })),
        }
    }

    /// Queue a reply batch; it becomes readable after the next unconsumed
    /// write. Batches are released in the order they were queued.
    pub fn reply_with(&self, steps: impl IntoIterator<Item = ReadStep>) {
        self.state.lock().replies.push_back(steps.into_iter().collect());
    }

    /// Inject a step readable immediately, without waiting for a write.
    pub fn push_unsolicited(&self, step: ReadStep) {
        self.state.lock().inbox.push_back(step);
    }

    /// Make the next write fail with a transport fault.
    pub fn fail_next_write(&self, message: impl Into<String>) {
        self.state.lock().fail_next_write = Some(message.into());
    }

    /// Everything written so far, decoded lossily.
    pub fn writes(&self) -> Vec<String> {
        self.state
            .lock()
            .write_log
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }

    /// Total number of `read_bytes` calls made against this link.
    pub fn reads_attempted(&self) -> usize {
        self.state.lock().reads_attempted
    }

    /// Scripted steps not yet consumed (inbox plus unreleased batches).
    pub fn steps_remaining(&self) -> usize {
        let state = self.state.lock();
        state.inbox.len() + state.replies.iter().map(Vec::len).sum::<usize>()
    }
}

impl SerialLink for MockLink {
    fn write_bytes(&mut self, data: &[u8]) -> Result<(), LinkError> {
        let mut state = self.state.lock();
        if let Some(message) = state.fail_next_write.take() {
            return Err(LinkError::Io(std::io::Error::other(message)));
        }
        state.write_log.push(data.to_vec());
        if let Some(batch) = state.replies.pop_front() {
            state.inbox.extend(batch);
        }
        Ok(())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, LinkError> {
        let mut state = self.state.lock();
        state.reads_attempted += 1;
        match state.inbox.pop_front() {
            None | Some(ReadStep::Silence) => {
                let timeout = state.timeout;
                Err(LinkError::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("no data within {timeout:?}"),
                )))
            }
            Some(ReadStep::Fault(message)) => Err(LinkError::Io(std::io::Error::other(message))),
            Some(ReadStep::Lost) => Err(LinkError::NotFound(self.name.clone())),
            Some(ReadStep::Line(bytes)) => {
                let n = bytes.len().min(buffer.len());
                buffer[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    // Remainder stays queued for the next read.
                    state.inbox.push_front(ReadStep::Line(bytes[n..].to_vec()));
                }
                Ok(n)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), LinkError> {
        self.state.lock().timeout = timeout;
        Ok(())
    }
}
