//! # logvisor
//!
//! **Logvisor** serves a live, filterable view of a continuously growing log
//! file over a persistent duplex connection. On session start it replays a
//! bounded window of the most recent lines, then forwards newly appended
//! lines matching a regular-expression predicate, in arrival order, until
//! the session ends. Clients may replace the predicate at any time without
//! restarting the session.
//!
//! The crate is transport-agnostic: the external connection layer (HTTP
//! upgrade, authentication) opens the file and the duplex channel, then hands
//! both halves to a [`SessionSupervisor`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   external handler (auth, upgrade, open file)
//!        │
//!        ▼  start(source, sink, control, options)
//! ┌──────────────────────────────────────────────────────────┐
//! │  SessionSupervisor                                       │
//! │  - compiles the initial Filter (Starting)                │
//! │  - owns the shared FilterHandle                          │
//! │  - first terminal outcome wins, sibling cancelled        │
//! │  - closes source/sink/control exactly once (Closed)      │
//! └───────┬──────────────────────────────┬───────────────────┘
//!         ▼                              ▼
//!  ┌──────────────┐              ┌─────────────────┐
//!  │    Tailer    │              │  ControlReader  │
//!  │ replay last  │  FilterHandle│ decode {"Filter"│
//!  │ N lines then │◄──ArcSwap───►│ :"…"} frames,   │
//!  │ follow + send│              │ swap predicate  │
//!  └──────┬───────┘              └─────────────────┘
//!         │ matching lines (raw bytes, file order)
//!         ▼
//!      FrameSink (outbound half of the duplex connection)
//! ```
//!
//! ### Session lifecycle
//! ```text
//! Starting ──► Streaming ──► Closed
//!
//! Starting:  initial pattern compiled; a bad pattern is returned to the
//!            caller and no tasks start.
//! Streaming: Tailer and ControlReader run concurrently, sharing the filter.
//! Closed:    the first terminal outcome (Completed | Cancelled | Failed) is
//!            recorded once; on Failed, one {"Error":{"Message":…}} frame is
//!            best-effort written before the transport closes.
//! ```
//!
//! ## Features
//! | Area          | Description                                               | Key types / traits                 |
//! |---------------|-----------------------------------------------------------|------------------------------------|
//! | **Sessions**  | Start, stop, and observe streaming sessions.              | [`SessionSupervisor`], [`Session`] |
//! | **Tailing**   | Bounded history replay, then live follow of appends.      | [`Tailer`]                         |
//! | **Filtering** | Atomically replaceable compiled line predicate.           | [`Filter`], [`FilterHandle`]       |
//! | **Transport** | Trait boundary to the duplex connection and wire frames.  | [`FrameSink`], [`FrameSource`]     |
//! | **Events**    | Injected lifecycle event bus; no global logging.          | [`Bus`], [`Event`], [`Subscribe`]  |
//! | **Errors**    | Typed, clonable session errors and terminal outcomes.     | [`SessionError`], [`TerminalOutcome`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```no_run
//! use logvisor::{Bus, Config, SessionOptions, SessionSupervisor};
//!
//! # async fn serve(sink: impl logvisor::FrameSink + 'static,
//! #                control: impl logvisor::FrameSource + 'static)
//! # -> Result<(), Box<dyn std::error::Error>> {
//! let supervisor = SessionSupervisor::new(Config::default(), Bus::new(1024));
//!
//! let file = tokio::fs::File::open("/var/log/juju/all-machines.log").await?;
//! let session = supervisor.start(
//!     file,
//!     sink,
//!     control,
//!     SessionOptions::new(100, "ERROR"),
//! )?;
//!
//! // Block the connection handler until the session is over.
//! let outcome = session.outcome().await;
//! println!("session {} ended: {}", session.name(), outcome.as_label());
//! # Ok(())
//! # }
//! ```

mod config;
mod control;
mod error;
mod events;
mod filter;
mod session;
mod subscribers;
mod tail;
mod wire;

#[cfg(test)]
mod testutil;

// ---- Public re-exports ----

pub use config::Config;
pub use control::ControlReader;
pub use error::SessionError;
pub use events::{Bus, Event, EventKind};
pub use filter::{Filter, FilterError, FilterHandle};
pub use session::{Session, SessionOptions, SessionState, SessionSupervisor, TerminalOutcome};
pub use subscribers::{spawn_subscriber, Subscribe};
pub use tail::Tailer;
pub use wire::{ControlMessage, ErrorBody, ErrorFrame, FrameSink, FrameSource};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
