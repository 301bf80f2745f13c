//! # Lifecycle events emitted by streaming sessions.
//!
//! The [`EventKind`] enum classifies session lifecycle transitions; the
//! [`Event`] struct carries metadata such as timestamp, session name, and a
//! free-form detail string (pattern, outcome label, window size).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore exact order when events from several
//! sessions interleave.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of session lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Session entered the streaming phase.
    ///
    /// Sets:
    /// - `session`: session name
    /// - `detail`: initial pattern
    SessionStarting,

    /// Historical window replay finished; subsequent lines are live.
    ///
    /// Sets:
    /// - `session`: session name
    ReplayCompleted,

    /// A control update installed a new filter.
    ///
    /// Sets:
    /// - `session`: session name
    /// - `detail`: the new pattern
    FilterReplaced,

    /// One of the session's tasks stopped without failing (completed or
    /// cancelled). Published after the task has been joined.
    ///
    /// Sets:
    /// - `session`: session name
    /// - `detail`: task name (`tail` or `control`)
    TaskStopped,

    /// One of the session's tasks stopped with a failure.
    ///
    /// Sets:
    /// - `session`: session name
    /// - `detail`: task name and error label (`tail: sink_write`)
    TaskFailed,

    /// Session reached its terminal state; resources released.
    ///
    /// Sets:
    /// - `session`: session name
    /// - `detail`: outcome label (`completed`, `cancelled`, or an error label)
    SessionClosed,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the session, if applicable.
    pub session: Option<Arc<str>>,
    /// Free-form detail (pattern, outcome label, ...).
    pub detail: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            session: None,
            detail: None,
        }
    }

    /// Attaches a session name.
    #[inline]
    pub fn with_session(mut self, session: impl Into<Arc<str>>) -> Self {
        self.session = Some(session.into());
        self
    }

    /// Attaches a detail string.
    #[inline]
    pub fn with_detail(mut self, detail: impl Into<Arc<str>>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::SessionStarting);
        let b = Event::new(EventKind::SessionClosed);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn builders_attach_metadata() {
        let ev = Event::new(EventKind::FilterReplaced)
            .with_session("session-1")
            .with_detail("ERROR");
        assert_eq!(ev.kind, EventKind::FilterReplaced);
        assert_eq!(ev.session.as_deref(), Some("session-1"));
        assert_eq!(ev.detail.as_deref(), Some("ERROR"));
    }
}
