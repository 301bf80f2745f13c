//! Error types used by the streaming session runtime.
//!
//! A session fails for exactly one reason, reported once by the task that hit
//! it and recorded by the supervisor as the terminal outcome. Cancellation and
//! a clean inbound EOF are *not* errors; they surface as
//! [`TerminalOutcome::Cancelled`](crate::TerminalOutcome) and
//! [`TerminalOutcome::Completed`](crate::TerminalOutcome).
//!
//! All variants carry their reason as a string so outcomes stay `Clone` and
//! can travel through watch channels and events.

use thiserror::Error;

use crate::filter::FilterError;

/// # Fatal session errors.
///
/// Each variant maps to one failure site in the session: the filter, the tail
/// loop, the outbound sink, or the inbound control stream. None of them are
/// retried; the supervisor cancels the sibling task and tears the session down.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A filter pattern failed to compile, at session start or via an update.
    #[error("invalid filter pattern: {reason}")]
    FilterCompile {
        /// The underlying compile error message.
        reason: String,
    },

    /// An I/O error occurred while reading the growing log source.
    #[error("cannot read log source: {reason}")]
    TailRead {
        /// The underlying I/O error message.
        reason: String,
    },

    /// A write to the outbound sink failed (remote end gone, transport error).
    #[error("cannot write to sink: {reason}")]
    SinkWrite {
        /// The underlying I/O error message.
        reason: String,
    },

    /// An inbound control message could not be read or decoded.
    #[error("malformed control message: {reason}")]
    ControlDecode {
        /// The underlying decode or transport error message.
        reason: String,
    },
}

impl SessionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use logvisor::SessionError;
    ///
    /// let err = SessionError::TailRead { reason: "broken".into() };
    /// assert_eq!(err.as_label(), "tail_read");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SessionError::FilterCompile { .. } => "filter_compile",
            SessionError::TailRead { .. } => "tail_read",
            SessionError::SinkWrite { .. } => "sink_write",
            SessionError::ControlDecode { .. } => "control_decode",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SessionError::FilterCompile { reason } => format!("filter: {reason}"),
            SessionError::TailRead { reason } => format!("read: {reason}"),
            SessionError::SinkWrite { reason } => format!("write: {reason}"),
            SessionError::ControlDecode { reason } => format!("control: {reason}"),
        }
    }
}

impl From<FilterError> for SessionError {
    fn from(err: FilterError) -> Self {
        SessionError::FilterCompile {
            reason: err.to_string(),
        }
    }
}
