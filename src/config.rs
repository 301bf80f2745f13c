//! # Runtime configuration for streaming sessions.
//!
//! Provides [`Config`] shared by every session a
//! [`SessionSupervisor`](crate::SessionSupervisor) starts. Per-session inputs
//! (history window, initial pattern) arrive separately via
//! [`SessionOptions`](crate::SessionOptions).
//!
//! ## Sentinel values
//! - `max_line = 0` → no line length cap
//! - `bus_capacity` is clamped to a minimum of 1 by the bus

use std::time::Duration;

/// Configuration shared by all sessions of one supervisor.
///
/// ## Field semantics
/// - `poll_interval`: how long the tail loop sleeps at end-of-source before
///   probing for appended bytes. The sleep is cancellable, so a stop request
///   never waits for it to elapse.
/// - `max_line`: upper bound on a single line's byte length (`0` = unbounded).
///   Exceeding it is a `TailRead` failure, bounding memory held for a line.
/// - `bus_capacity`: event bus ring buffer size; slow subscribers that lag
///   further than this observe `Lagged` and skip older events.
#[derive(Clone, Debug)]
pub struct Config {
    /// Idle sleep between end-of-source probes in the live phase.
    pub poll_interval: Duration,

    /// Maximum byte length of one log line (`0` = unbounded).
    pub max_line: usize,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the line length cap as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(n)` → lines longer than `n` bytes fail the session
    #[inline]
    pub fn line_cap(&self) -> Option<usize> {
        if self.max_line == 0 {
            None
        } else {
            Some(self.max_line)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `poll_interval = 250ms` (same order as classic `tail -f` polling)
    /// - `max_line = 0` (unbounded)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            max_line: 0,
            bus_capacity: 1024,
        }
    }
}
