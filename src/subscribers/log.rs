//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints session lifecycle events to stdout in a
//! human-readable format.
//!
//! ## Output format
//! ```text
//! [starting] session=session-1 filter=""
//! [replay-done] session=session-1
//! [filter] session=session-1 pattern="ERROR"
//! [task-stopped] session=session-1 task=tail
//! [task-stopped] session=session-1 task=control
//! [closed] session=session-1 outcome=cancelled
//! ```

use async_trait::async_trait;

use super::subscribe::Subscribe;
use crate::events::{Event, EventKind};

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Not intended for production use —
/// implement a custom [`Subscribe`] for structured logging or metrics.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let session = e.session.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::SessionStarting => {
                println!(
                    "[starting] session={session} filter={:?}",
                    e.detail.as_deref().unwrap_or("")
                );
            }
            EventKind::ReplayCompleted => {
                println!("[replay-done] session={session}");
            }
            EventKind::FilterReplaced => {
                println!(
                    "[filter] session={session} pattern={:?}",
                    e.detail.as_deref().unwrap_or("")
                );
            }
            EventKind::TaskStopped => {
                println!(
                    "[task-stopped] session={session} task={}",
                    e.detail.as_deref().unwrap_or("-")
                );
            }
            EventKind::TaskFailed => {
                println!(
                    "[task-failed] session={session} task={}",
                    e.detail.as_deref().unwrap_or("-")
                );
            }
            EventKind::SessionClosed => {
                println!(
                    "[closed] session={session} outcome={}",
                    e.detail.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
