//! The job worker: a dedicated thread owning the port session.
//!
//! The worker pulls jobs from an unbounded FIFO queue and executes exactly
//! one at a time against the session, so there is at most one in-flight
//! serial operation and the session is never touched concurrently. After
//! each job (or each quiet interval while a session is open) it performs one
//! opportunistic receive so unsolicited traffic still surfaces.
//!
//! While no session is open the worker blocks on the queue; Send and
//! Receive jobs arriving in that state are deferred in submission order and
//! run once a session is live again. I/O failures never terminate the loop;
//! they are converted into [`Notification`]s and the worker moves on. The
//! loop exits only when every producer handle has been dropped.

mod job;

pub use job::{Job, Notification};

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::config::SerialConfig;
use crate::port::{LinkError, SerialLink};
use crate::protocol::StatusToken;
use crate::session::{PortSession, ReadOutcome};

/// Tuning knobs for the worker loop. The defaults mirror the modem
/// firmware's cadence; none of them is load-bearing for correctness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Total reads attempted per send job before reporting no response.
    pub retry_attempts: u32,
    /// How long to wait for a new job between loop iterations while a
    /// session is open.
    pub poll_interval: Duration,
    /// Timeout for each opportunistic receive.
    pub receive_timeout: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            retry_attempts: 5,
            poll_interval: Duration::from_millis(50),
            receive_timeout: Duration::from_millis(50),
        }
    }
}

impl From<&SerialConfig> for WorkerSettings {
    fn from(config: &SerialConfig) -> Self {
        Self {
            retry_attempts: config.retry_attempts,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            receive_timeout: Duration::from_millis(config.receive_timeout_ms),
        }
    }
}

/// Submission failed because the worker thread is gone.
#[derive(Debug, Error)]
#[error("worker thread is not running")]
pub struct WorkerGone;

/// Producer-side handle to the worker. All submission methods are
/// non-blocking fire-and-forget; outcomes arrive on the notification
/// receiver returned by [`Worker::spawn`].
#[derive(Debug)]
pub struct WorkerHandle {
    jobs: Sender<Job>,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    /// Queue a send job: write `text` and wait for a response with the
    /// bounded retry protocol.
    pub fn submit_send(
        &self,
        text: impl Into<String>,
        timeout: Duration,
    ) -> Result<(), WorkerGone> {
        self.submit(Job::Send {
            payload: text.into(),
            timeout,
        })
    }

    /// Queue an explicit receive job.
    pub fn submit_receive(&self, timeout: Duration) -> Result<(), WorkerGone> {
        self.submit(Job::Receive { timeout })
    }

    /// Queue opening the device at `path`. Any live session is replaced.
    pub fn open(&self, path: impl Into<String>, baud_rate: u32) -> Result<(), WorkerGone> {
        self.submit(Job::Open {
            path: path.into(),
            baud_rate,
        })
    }

    /// Queue closing the session.
    pub fn close(&self) -> Result<(), WorkerGone> {
        self.submit(Job::Close)
    }

    /// Queue attaching an already-constructed link.
    pub fn attach(&self, link: Box<dyn SerialLink>) -> Result<(), WorkerGone> {
        self.submit(Job::Attach(link))
    }

    fn submit(&self, job: Job) -> Result<(), WorkerGone> {
        trace!(?job, "job submitted");
        self.jobs.send(job).map_err(|_| WorkerGone)
    }

    /// Disconnect the queue and wait for the worker to drain and stop.
    pub fn shutdown(self) {
        let WorkerHandle { jobs, thread } = self;
        drop(jobs);
        if thread.join().is_err() {
            warn!("worker thread panicked during shutdown");
        }
    }
}

/// The worker loop state. Lives entirely on the worker thread.
pub struct Worker {
    settings: WorkerSettings,
    jobs: Receiver<Job>,
    /// Send/Receive jobs that arrived while no session was open.
    deferred: VecDeque<Job>,
    session: PortSession,
    notifier: Sender<Notification>,
}

impl Worker {
    /// Spawn the worker thread. Returns the producer handle and the
    /// notification receiver.
    pub fn spawn(settings: WorkerSettings) -> (WorkerHandle, Receiver<Notification>) {
        let (job_tx, job_rx) = mpsc::channel();
        let (note_tx, note_rx) = mpsc::channel();

        let worker = Worker {
            settings,
            jobs: job_rx,
            deferred: VecDeque::new(),
            session: PortSession::new(),
            notifier: note_tx,
        };
        let thread = thread::spawn(move || worker.run());

        (
            WorkerHandle {
                jobs: job_tx,
                thread,
            },
            note_rx,
        )
    }

    fn run(mut self) {
        info!("serial worker running");
        loop {
            if self.session.is_open() {
                // One job per iteration, deferred backlog first, then the
                // queue. Waiting on the queue doubles as the loop's rest.
                let job = match self.deferred.pop_front() {
                    Some(job) => Some(job),
                    None => match self.jobs.recv_timeout(self.settings.poll_interval) {
                        Ok(job) => Some(job),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    },
                };
                if let Some(job) = job {
                    self.run_job(job);
                }
                if self.session.is_open() {
                    self.opportunistic_receive();
                }
            } else {
                // No session: nothing to poll, block until a job arrives.
                match self.jobs.recv() {
                    Ok(job) if job.needs_session() => {
                        debug!("no session open, deferring job");
                        self.deferred.push_back(job);
                    }
                    Ok(job) => self.run_job(job),
                    Err(_) => break,
                }
            }
        }
        info!("serial worker stopped");
    }

    fn run_job(&mut self, job: Job) {
        match job {
            Job::Send { payload, timeout } => self.run_send(&payload, timeout),
            Job::Receive { timeout } => self.receive_one(timeout, false),
            Job::Open { path, baud_rate } => self.run_open(&path, baud_rate),
            Job::Close => self.session.close(),
            Job::Attach(link) => self.session.attach(link),
        }
    }

    fn run_open(&mut self, path: &str, baud_rate: u32) {
        // Replacing a live session goes through here too, so the old link
        // is released before the new device is claimed.
        self.session.close();
        if let Err(e) = self.session.open(path, baud_rate) {
            warn!(path, error = %e, "failed to open port");
            self.notify(Notification::Error(format!(
                "Could not open {path}: {e}. Choose another port and try again."
            )));
        }
    }

    fn run_send(&mut self, payload: &str, timeout: Duration) {
        debug!(len = payload.len(), "processing send job");
        if let Err(e) = self.session.write_line(payload) {
            self.fail_job(e);
            return;
        }
        for attempt in 1..=self.settings.retry_attempts {
            match self.session.read_line(timeout) {
                Ok(ReadOutcome::Line(line)) if !is_no_message(&line) => {
                    trace!(attempt, "response received");
                    self.notify(Notification::Response(line));
                    return;
                }
                Ok(_) => trace!(attempt, "no message yet"),
                Err(e) => {
                    self.fail_job(e);
                    return;
                }
            }
        }
        debug!(
            attempts = self.settings.retry_attempts,
            "retry bound exhausted"
        );
        self.notify(Notification::NoResponse);
    }

    fn opportunistic_receive(&mut self) {
        self.receive_one(self.settings.receive_timeout, true);
    }

    /// Read one line. No-message outcomes are discarded silently; real
    /// lines are published verbatim.
    fn receive_one(&mut self, timeout: Duration, opportunistic: bool) {
        match self.session.read_line(timeout) {
            Ok(ReadOutcome::Line(line)) if !is_no_message(&line) => {
                trace!(opportunistic, "unsolicited line received");
                self.notify(Notification::Response(line));
            }
            Ok(_) => {}
            Err(e) => self.fail_job(e),
        }
    }

    /// Convert an I/O failure into a notification. Connection errors also
    /// tear the session down so the user can pick another port.
    fn fail_job(&mut self, error: LinkError) {
        warn!(error = %error, "serial job failed");
        if error.is_connection_error() {
            self.session.close();
            self.notify(Notification::Error(format!(
                "{error}. Choose another port and try again."
            )));
        } else {
            self.notify(Notification::Error(error.to_string()));
        }
    }

    fn notify(&self, notification: Notification) {
        // The consumer may have gone away; the worker keeps running either way.
        let _ = self.notifier.send(notification);
    }
}

fn is_no_message(line: &str) -> bool {
    StatusToken::detect(line) == Some(StatusToken::NoMessage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_preserve_original_cadence() {
        let settings = WorkerSettings::default();
        assert_eq!(settings.retry_attempts, 5);
        assert_eq!(settings.poll_interval, Duration::from_millis(50));
    }

    #[test]
    fn settings_come_from_serial_config() {
        let config = SerialConfig {
            retry_attempts: 3,
            poll_interval_ms: 10,
            receive_timeout_ms: 20,
            ..SerialConfig::default()
        };
        let settings = WorkerSettings::from(&config);
        assert_eq!(settings.retry_attempts, 3);
        assert_eq!(settings.poll_interval, Duration::from_millis(10));
        assert_eq!(settings.receive_timeout, Duration::from_millis(20));
    }

    #[test]
    fn no_message_token_is_detected_inside_lines() {
        assert!(is_no_message("#106"));
        assert!(is_no_message("status #106 end"));
        assert!(!is_no_message("hello"));
        assert!(!is_no_message("#107"));
    }
}
