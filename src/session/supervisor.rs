//! # SessionSupervisor: per-connection supervision and teardown.
//!
//! The supervisor owns the shared [`FilterHandle`], spawns the tailer and the
//! control reader as two tokio tasks with child cancellation tokens, and
//! merges their results into the session's single terminal outcome.
//!
//! ## Wiring
//! ```text
//! start(source, sink, control, options)
//!   ├─ compile initial filter          (Starting; failure → caller, no tasks)
//!   ├─ spawn stream loop ──────────────────────────────┐
//!   └─ return Session handle                           │
//!                                                      ▼
//!   Tailer::run(child₁) ─┐                 ┌─ ControlReader::run(child₂)
//!                        │                 │
//!                 ┌──────▼─────────────────▼──────┐
//!                 │ select! first finished task   │
//!                 │   cancel sibling, join it     │
//!                 │   record first outcome        │
//!                 │   Failed → one error frame    │
//!                 │   drop sink + control (close) │
//!                 │   publish SessionClosed       │
//!                 └───────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Exactly one outcome is recorded; ties go to whichever task finished
//!   first.
//! - The source and both transport halves are closed exactly once, after
//!   both tasks have observably stopped.
//! - The terminal error frame is best effort: a failure to deliver it is
//!   swallowed and the transport closes regardless.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncSeek};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

use super::handle::{Session, SessionOptions, SessionState, TerminalOutcome};
use crate::config::Config;
use crate::control::ControlReader;
use crate::error::SessionError;
use crate::events::{Bus, Event, EventKind};
use crate::filter::{Filter, FilterHandle};
use crate::tail::Tailer;
use crate::wire::{ErrorFrame, FrameSink, FrameSource};

/// Process-wide counter used to name sessions.
static SESSION_SEQ: AtomicU64 = AtomicU64::new(0);

/// Starts and supervises streaming sessions.
///
/// One supervisor serves many sessions; each `start` call spawns an
/// independent session with its own filter, tasks, and stop token. The bus
/// is injected so the embedding server decides where lifecycle events go —
/// there is no global logging singleton.
pub struct SessionSupervisor {
    cfg: Config,
    bus: Bus,
}

impl SessionSupervisor {
    /// Creates a supervisor publishing to the given bus.
    pub fn new(cfg: Config, bus: Bus) -> Self {
        Self { cfg, bus }
    }

    /// Creates a supervisor with its own bus sized from the config.
    pub fn with_default_bus(cfg: Config) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self::new(cfg, bus)
    }

    /// Returns the event bus this supervisor publishes to.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Starts one session over an open source and duplex transport.
    ///
    /// Compiles the initial filter while still `Starting`: a bad pattern is
    /// returned to the caller here and no tasks are spawned. On success the
    /// session is `Streaming` and the returned handle can be used to `stop`
    /// it or await its `outcome`.
    pub fn start<R, S, C>(
        &self,
        source: R,
        sink: S,
        control: C,
        options: SessionOptions,
    ) -> Result<Session, SessionError>
    where
        R: AsyncRead + AsyncSeek + Unpin + Send + 'static,
        S: FrameSink + 'static,
        C: FrameSource + 'static,
    {
        let initial = Filter::compile(&options.pattern)?;
        let filter = Arc::new(FilterHandle::new(initial));

        let name: Arc<str> = format!(
            "session-{}",
            SESSION_SEQ.fetch_add(1, AtomicOrdering::Relaxed)
        )
        .into();
        let stop = CancellationToken::new();
        let (state_tx, state_rx) = watch::channel(SessionState::Starting);
        let (outcome_tx, outcome_rx) = watch::channel(None::<TerminalOutcome>);

        // The handle the caller receives is already Streaming; only a compile
        // failure above leaves a session in Starting, and that one is never
        // observable from outside.
        state_tx.send_replace(SessionState::Streaming);

        tokio::spawn(Self::stream(
            self.cfg.clone(),
            self.bus.clone(),
            name.clone(),
            source,
            sink,
            control,
            filter,
            options,
            stop.clone(),
            state_tx,
            outcome_tx,
        ));

        Ok(Session {
            name,
            stop,
            state: state_rx,
            outcome: outcome_rx,
        })
    }

    /// The supervisor loop for one session. Performs no I/O itself except
    /// the best-effort terminal error frame.
    #[allow(clippy::too_many_arguments)]
    async fn stream<R, S, C>(
        cfg: Config,
        bus: Bus,
        name: Arc<str>,
        source: R,
        sink: S,
        control: C,
        filter: Arc<FilterHandle>,
        options: SessionOptions,
        stop: CancellationToken,
        state_tx: watch::Sender<SessionState>,
        outcome_tx: watch::Sender<Option<TerminalOutcome>>,
    ) where
        R: AsyncRead + AsyncSeek + Unpin + Send + 'static,
        S: FrameSink + 'static,
        C: FrameSource + 'static,
    {
        bus.publish(
            Event::new(EventKind::SessionStarting)
                .with_session(name.clone())
                .with_detail(options.pattern.clone()),
        );

        let tail_token = stop.child_token();
        let ctrl_token = stop.child_token();

        let tailer = Tailer::new(
            &cfg,
            source,
            sink,
            filter.clone(),
            options.window,
            bus.clone(),
            name.clone(),
        );
        let reader = ControlReader::new(control, filter, bus.clone(), name.clone());

        let mut tail: JoinHandle<(TerminalOutcome, S)> = tokio::spawn(tailer.run(tail_token.clone()));
        let mut ctrl: JoinHandle<TerminalOutcome> = tokio::spawn(reader.run(ctrl_token.clone()));

        // First terminal outcome wins; the sibling is cancelled and joined
        // before anything is recorded or released.
        let (outcome, tail_outcome, ctrl_outcome, mut sink) = tokio::select! {
            res = &mut tail => {
                ctrl_token.cancel();
                let ctrl_outcome = ctrl_result((&mut ctrl).await);
                let (tail_outcome, sink) = tail_result(res);
                (tail_outcome.clone(), tail_outcome, ctrl_outcome, sink)
            }
            res = &mut ctrl => {
                tail_token.cancel();
                let (tail_outcome, sink) = tail_result((&mut tail).await);
                let ctrl_outcome = ctrl_result(res);
                (ctrl_outcome.clone(), tail_outcome, ctrl_outcome, sink)
            }
        };

        publish_task_stop(&bus, &name, "tail", &tail_outcome);
        publish_task_stop(&bus, &name, "control", &ctrl_outcome);

        if let TerminalOutcome::Failed(err) = &outcome {
            if let Some(sink) = sink.as_mut() {
                if let Ok(frame) = serde_json::to_vec(&ErrorFrame::new(err.to_string())) {
                    // Best effort: the transport is closing regardless.
                    let _ = sink.send(&frame).await;
                }
            }
        }
        // Sink closes here; the control half closed when its task returned.
        drop(sink);

        bus.publish(
            Event::new(EventKind::SessionClosed)
                .with_session(name)
                .with_detail(outcome.as_label()),
        );
        state_tx.send_replace(SessionState::Closed);
        outcome_tx.send_replace(Some(outcome));
    }
}

/// Unpacks the tail task's join result. A panicked task cannot report an
/// outcome or return the sink; the session records a cancellation.
fn tail_result<S>(res: Result<(TerminalOutcome, S), JoinError>) -> (TerminalOutcome, Option<S>) {
    match res {
        Ok((outcome, sink)) => (outcome, Some(sink)),
        Err(_) => (TerminalOutcome::Cancelled, None),
    }
}

/// Unpacks the control task's join result.
fn ctrl_result(res: Result<TerminalOutcome, JoinError>) -> TerminalOutcome {
    res.unwrap_or(TerminalOutcome::Cancelled)
}

/// Publishes the per-task stop event once the task has been joined.
fn publish_task_stop(bus: &Bus, session: &Arc<str>, task: &str, outcome: &TerminalOutcome) {
    let (kind, detail) = if outcome.is_failure() {
        (
            EventKind::TaskFailed,
            format!("{task}: {}", outcome.as_label()),
        )
    } else {
        (EventKind::TaskStopped, task.to_string())
    };
    bus.publish(
        Event::new(kind)
            .with_session(session.clone())
            .with_detail(detail),
    );
}
