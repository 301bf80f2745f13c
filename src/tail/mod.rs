//! Tailing engine: bounded history replay, then live follow.
//!
//! The tailer converts a growing, seekable byte source into an ordered,
//! filtered line stream. It runs as one of the two long-lived tasks of a
//! session (the other being the control reader).
//!
//! Internal modules:
//! - [`window`]: single-pass scan locating the last `window` line starts;
//! - [`tailer`]: the replay-then-follow loop that applies the filter and
//!   writes matching lines to the sink.

mod tailer;
mod window;

pub use tailer::Tailer;
