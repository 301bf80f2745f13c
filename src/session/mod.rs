//! Session core: lifecycle and supervision.
//!
//! One session per duplex connection. The only public entry point is
//! [`SessionSupervisor`], which owns the shared filter, runs the tailer and
//! the control reader concurrently, and implements the termination protocol:
//! first terminal outcome wins, the sibling task is cancelled, resources are
//! released exactly once.
//!
//! Internal modules:
//! - [`handle`]: the [`Session`] handle, lifecycle state and terminal outcome;
//! - [`supervisor`]: spawning, outcome merging, teardown, error reporting.

mod handle;
mod supervisor;

pub use handle::{Session, SessionOptions, SessionState, TerminalOutcome};
pub use supervisor::SessionSupervisor;
