//! # Session handle, lifecycle state, and terminal outcome.
//!
//! A [`Session`] is the caller-facing handle returned by
//! [`SessionSupervisor::start`](crate::SessionSupervisor::start). It carries
//! no I/O; it observes the supervisor loop through watch channels and can
//! request cancellation through the shared stop token.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::SessionError;

/// Per-session inputs supplied by the external connection layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Requested history window: number of most recent lines to replay at
    /// start. `0` means no replay — tailing begins at the current end.
    pub window: usize,
    /// Initial filter pattern; empty matches every line.
    pub pattern: String,
}

impl SessionOptions {
    /// Builds options from a requested window and pattern.
    pub fn new(window: usize, pattern: impl Into<String>) -> Self {
        Self {
            window,
            pattern: pattern.into(),
        }
    }
}

impl Default for SessionOptions {
    /// No replay, match-everything filter.
    fn default() -> Self {
        Self {
            window: 0,
            pattern: String::new(),
        }
    }
}

/// Lifecycle of a session.
///
/// `Starting` exists only inside [`SessionSupervisor::start`]; a handle the
/// caller holds is already `Streaming` (or `Closed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Validating inputs and compiling the initial filter.
    Starting,
    /// Tailer and control reader are running.
    Streaming,
    /// Terminal outcome recorded, resources released.
    Closed,
}

/// The single, final disposition of a session. Recorded exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOutcome {
    /// The session ended cleanly (client closed its inbound side).
    Completed,
    /// An explicit stop was requested; not an error.
    Cancelled,
    /// The session failed; the reason was best-effort reported to the client.
    Failed(SessionError),
}

impl TerminalOutcome {
    /// Returns a short stable label (snake_case) for logs/events.
    pub fn as_label(&self) -> &'static str {
        match self {
            TerminalOutcome::Completed => "completed",
            TerminalOutcome::Cancelled => "cancelled",
            TerminalOutcome::Failed(err) => err.as_label(),
        }
    }

    /// True for `Failed`.
    pub fn is_failure(&self) -> bool {
        matches!(self, TerminalOutcome::Failed(_))
    }
}

/// Caller-facing handle to one running session.
///
/// Cheap to clone; all clones observe the same session.
#[derive(Debug, Clone)]
pub struct Session {
    pub(super) name: Arc<str>,
    pub(super) stop: CancellationToken,
    pub(super) state: watch::Receiver<SessionState>,
    pub(super) outcome: watch::Receiver<Option<TerminalOutcome>>,
}

impl Session {
    /// Returns the session's name (unique per supervisor process).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Requests cancellation. Idempotent; both tasks observe it at their
    /// next suspension point.
    pub fn stop(&self) {
        self.stop.cancel();
    }

    /// Waits until the session is `Closed` and returns the recorded outcome.
    pub async fn outcome(&self) -> TerminalOutcome {
        let mut rx = self.outcome.clone();
        let recorded = rx.wait_for(|outcome| outcome.is_some()).await;
        match recorded {
            Ok(recorded) => recorded.clone().unwrap_or(TerminalOutcome::Cancelled),
            // The supervisor loop vanished without recording (runtime
            // teardown); nothing ran past that point.
            Err(_) => TerminalOutcome::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_labels_are_stable() {
        assert_eq!(TerminalOutcome::Completed.as_label(), "completed");
        assert_eq!(TerminalOutcome::Cancelled.as_label(), "cancelled");
        let failed = TerminalOutcome::Failed(SessionError::SinkWrite {
            reason: "gone".into(),
        });
        assert_eq!(failed.as_label(), "sink_write");
        assert!(failed.is_failure());
        assert!(!TerminalOutcome::Completed.is_failure());
    }

    #[test]
    fn default_options_replay_nothing() {
        let opts = SessionOptions::default();
        assert_eq!(opts.window, 0);
        assert!(opts.pattern.is_empty());
    }
}
