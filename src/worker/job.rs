//! Job and notification types.

use std::time::Duration;

use crate::port::SerialLink;

/// A unit of work submitted to the worker thread.
///
/// Session lifecycle transitions (`Open`, `Close`, `Attach`) are jobs too,
/// so they are serialized with in-flight I/O instead of racing it from the
/// producer thread.
#[derive(Debug)]
pub enum Job {
    /// Write a text line and wait for a response, retrying past no-message
    /// reads up to the configured bound.
    Send { payload: String, timeout: Duration },
    /// Explicitly read one line.
    Receive { timeout: Duration },
    /// Open the serial device at `path`.
    Open { path: String, baud_rate: u32 },
    /// Close the session. Idempotent.
    Close,
    /// Attach an already-constructed link (dependency injection for tests).
    Attach(Box<dyn SerialLink>),
}

impl Job {
    /// Send and Receive need a live session; while the session is closed
    /// they wait in FIFO order instead of failing.
    pub(crate) fn needs_session(&self) -> bool {
        matches!(self, Job::Send { .. } | Job::Receive { .. })
    }
}

/// An asynchronous outcome published by the worker.
///
/// One channel carries all three logical streams (response, progress,
/// error); delivery order matches the worker's processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A response line arrived (terminator stripped).
    Response(String),
    /// A send job exhausted its read retries with nothing but no-message
    /// sentinels. A remote-side non-reply, not a local fault.
    NoResponse,
    /// Reserved for long-running job progress. Currently unused.
    Progress(String),
    /// A connection or transport fault, described for the user.
    Error(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_jobs_need_a_session() {
        assert!(Job::Send {
            payload: "hi".into(),
            timeout: Duration::from_secs(1)
        }
        .needs_session());
        assert!(Job::Receive {
            timeout: Duration::from_secs(1)
        }
        .needs_session());
        assert!(!Job::Close.needs_session());
        assert!(!Job::Open {
            path: "/dev/ttyUSB0".into(),
            baud_rate: 57_600
        }
        .needs_session());
    }
}
