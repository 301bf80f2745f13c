//! # Tailer: replay the recent window, then follow appends.
//!
//! Supervises no one; this is the data path of a session. The loop below is
//! the same for both phases — the window scan only decides where reading
//! resumes, so historical and live lines pass through the identical
//! filter-and-emit path (uniform filtering).
//!
//! ## Flow
//! ```text
//! seek(0) ──► window::scan ──► seek(resume)
//!                                  │
//!                 ┌────────────────▼───────────────────┐
//!                 │ read_until('\n')                   │
//!                 │   ├─ 0 bytes → publish ReplayDone  │
//!                 │   │            (first time only)   │
//!                 │   │            cancellable sleep ──┤
//!                 │   ├─ partial  → keep accumulating ─┤
//!                 │   └─ complete → filter.matches?    │
//!                 │                   └─ yes → sink ───┤
//!                 └────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Lines reach the sink in strict source-offset order.
//! - At most one line's partial bytes are buffered across reads.
//! - Cancellation is observed at every suspension point (idle sleep, sink
//!   write) and between lines.
//! - Read and write failures are fatal; the loop reports once and stops.

use std::io::SeekFrom;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncSeek, AsyncSeekExt, BufReader};
use tokio::time;
use tokio_util::sync::CancellationToken;

use super::window;
use crate::config::Config;
use crate::error::SessionError;
use crate::events::{Bus, Event, EventKind};
use crate::filter::FilterHandle;
use crate::session::TerminalOutcome;
use crate::wire::FrameSink;

/// Why the tail loop stopped.
enum TailStop {
    Cancelled,
    Failed(SessionError),
}

/// Converts a growing byte source into an ordered, filtered line stream.
///
/// Owns the source and the sink for the lifetime of the session; the sink is
/// handed back to the supervisor on exit so the terminal error frame can be
/// written by exactly one owner.
pub struct Tailer<R, S> {
    source: R,
    sink: S,
    filter: Arc<FilterHandle>,
    window: usize,
    poll_interval: Duration,
    line_cap: Option<usize>,
    bus: Bus,
    session: Arc<str>,
}

impl<R, S> Tailer<R, S>
where
    R: AsyncRead + AsyncSeek + Unpin + Send,
    S: FrameSink,
{
    /// Creates a tailer for one session.
    pub fn new(
        cfg: &Config,
        source: R,
        sink: S,
        filter: Arc<FilterHandle>,
        window: usize,
        bus: Bus,
        session: Arc<str>,
    ) -> Self {
        Self {
            source,
            sink,
            filter,
            window,
            poll_interval: cfg.poll_interval,
            line_cap: cfg.line_cap(),
            bus,
            session,
        }
    }

    /// Runs until cancelled or a fatal read/write error.
    ///
    /// Returns the terminal outcome together with the sink, so the supervisor
    /// regains the outbound half for best-effort error reporting and close.
    pub async fn run(mut self, token: CancellationToken) -> (TerminalOutcome, S) {
        let outcome = match self.stream(&token).await {
            Ok(()) => TerminalOutcome::Completed,
            Err(TailStop::Cancelled) => TerminalOutcome::Cancelled,
            Err(TailStop::Failed(err)) => TerminalOutcome::Failed(err),
        };
        (outcome, self.sink)
    }

    async fn stream(&mut self, token: &CancellationToken) -> Result<(), TailStop> {
        let mut reader = BufReader::new(&mut self.source);
        reader
            .seek(SeekFrom::Start(0))
            .await
            .map_err(read_failure)?;
        let plan = window::scan(&mut reader, self.window, self.line_cap)
            .await
            .map_err(read_failure)?;
        reader
            .seek(SeekFrom::Start(plan.resume))
            .await
            .map_err(read_failure)?;

        let mut line: Vec<u8> = Vec::new();
        let mut replaying = true;
        loop {
            if token.is_cancelled() {
                return Err(TailStop::Cancelled);
            }
            let n = reader
                .read_until(b'\n', &mut line)
                .await
                .map_err(read_failure)?;
            if n == 0 {
                if replaying {
                    replaying = false;
                    self.bus.publish(
                        Event::new(EventKind::ReplayCompleted).with_session(self.session.clone()),
                    );
                }
                tokio::select! {
                    _ = token.cancelled() => return Err(TailStop::Cancelled),
                    _ = time::sleep(self.poll_interval) => {}
                }
                continue;
            }
            if let Some(cap) = self.line_cap {
                if line.len() > cap {
                    return Err(TailStop::Failed(SessionError::TailRead {
                        reason: format!("line exceeds {cap} bytes"),
                    }));
                }
            }
            if line.last() != Some(&b'\n') {
                // Incomplete line: the writer is mid-append. Keep the bytes
                // and resume the read on the next pass.
                continue;
            }
            if self.filter.matches(trim_terminator(&line)) {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(TailStop::Cancelled),
                    res = self.sink.send(&line) => {
                        res.map_err(|e| TailStop::Failed(SessionError::SinkWrite {
                            reason: e.to_string(),
                        }))?;
                    }
                }
            }
            line.clear();
        }
    }
}

fn read_failure(err: std::io::Error) -> TailStop {
    TailStop::Failed(SessionError::TailRead {
        reason: err.to_string(),
    })
}

/// The filter sees the line without its terminator so that `$`-anchored
/// patterns behave as expected; the sink still receives the bytes verbatim.
fn trim_terminator(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    if end > 0 && line[end - 1] == b'\n' {
        end -= 1;
    }
    if end > 0 && line[end - 1] == b'\r' {
        end -= 1;
    }
    &line[..end]
}
