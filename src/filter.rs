//! # Line filter: an immutable compiled predicate, atomically replaceable.
//!
//! A [`Filter`] is a compiled `regex::bytes` predicate over raw line bytes.
//! It is never mutated in place; a control update builds a whole new `Filter`
//! and swaps it into the session's [`FilterHandle`], so a reader always
//! observes a complete, valid predicate.
//!
//! ## Replace semantics
//! ```text
//!  Tailer ──► FilterHandle::matches(line) ──► ArcSwap::load ──► Regex::is_match
//!                                                  ▲
//!  Control Reader ──► FilterHandle::replace ──► ArcSwap::swap (lock-free)
//! ```
//!
//! - `replace` is visible to every subsequent `matches` call on any task;
//!   a `matches` call already in flight may still see the previous predicate.
//! - Readers never take a lock, so a match check can never stall a control
//!   update (and vice versa) across I/O.
//! - Each installed filter carries a monotonic generation marker.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use regex::bytes::Regex;
use thiserror::Error;

/// A filter pattern failed to compile.
///
/// Returned by [`Filter::compile`]; the pattern is echoed back so the failure
/// can be reported to the client verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot compile pattern {pattern:?}: {reason}")]
pub struct FilterError {
    /// The rejected pattern.
    pub pattern: String,
    /// The regex engine's error message.
    pub reason: String,
}

/// An immutable compiled line predicate.
///
/// The empty pattern compiles to an always-match predicate, which is how a
/// session streams unfiltered.
#[derive(Debug, Clone)]
pub struct Filter {
    regex: Regex,
    pattern: String,
    generation: u64,
}

impl Filter {
    /// Compiles `pattern` into a filter.
    ///
    /// The generation marker is assigned when the filter is installed into a
    /// [`FilterHandle`]; a freshly compiled filter carries generation 0.
    pub fn compile(pattern: &str) -> Result<Filter, FilterError> {
        let regex = Regex::new(pattern).map_err(|e| FilterError {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Filter {
            regex,
            pattern: pattern.to_string(),
            generation: 0,
        })
    }

    /// Tests `line` against the predicate.
    #[inline]
    pub fn matches(&self, line: &[u8]) -> bool {
        self.regex.is_match(line)
    }

    /// Returns the source pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the generation assigned at install time (0 = never installed).
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Shared, atomically swappable filter slot.
///
/// One handle exists per session, shared between the tail loop (reader) and
/// the control reader (writer). See the module docs for the visibility rules.
#[derive(Debug)]
pub struct FilterHandle {
    current: ArcSwap<Filter>,
    generation: AtomicU64,
}

impl FilterHandle {
    /// Creates a handle holding `initial` as generation 1.
    pub fn new(mut initial: Filter) -> Self {
        initial.generation = 1;
        Self {
            current: ArcSwap::from_pointee(initial),
            generation: AtomicU64::new(1),
        }
    }

    /// Tests `line` against the currently installed predicate.
    #[inline]
    pub fn matches(&self, line: &[u8]) -> bool {
        self.current.load().matches(line)
    }

    /// Atomically installs `next`, returning its assigned generation.
    ///
    /// The previous filter drains naturally via its `Arc` refcount once all
    /// in-flight `matches` calls complete.
    pub fn replace(&self, mut next: Filter) -> u64 {
        let generation = self.generation.fetch_add(1, AtomicOrdering::Relaxed) + 1;
        next.generation = generation;
        self.current.store(Arc::new(next));
        generation
    }

    /// Returns the currently installed filter.
    pub fn snapshot(&self) -> Arc<Filter> {
        self.current.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_matches_everything() {
        let f = Filter::compile("").unwrap();
        assert!(f.matches(b""));
        assert!(f.matches(b"anything at all"));
        assert!(f.matches(&[0xff, 0xfe, 0x00]));
    }

    #[test]
    fn pattern_matches_line_bytes() {
        let f = Filter::compile("ERROR").unwrap();
        assert!(f.matches(b"machine-0: ERROR something broke"));
        assert!(!f.matches(b"machine-0: INFO all fine"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = Filter::compile("[unclosed").unwrap_err();
        assert_eq!(err.pattern, "[unclosed");
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn replace_is_visible_to_subsequent_matches() {
        let handle = FilterHandle::new(Filter::compile("ERROR").unwrap());
        assert!(handle.matches(b"ERROR boom"));
        assert!(!handle.matches(b"WARNING meh"));

        handle.replace(Filter::compile("WARNING").unwrap());
        assert!(!handle.matches(b"ERROR boom"));
        assert!(handle.matches(b"WARNING meh"));
    }

    #[test]
    fn generations_are_monotonic() {
        let handle = FilterHandle::new(Filter::compile("").unwrap());
        assert_eq!(handle.snapshot().generation(), 1);
        let g2 = handle.replace(Filter::compile("a").unwrap());
        let g3 = handle.replace(Filter::compile("b").unwrap());
        assert_eq!(g2, 2);
        assert_eq!(g3, 3);
        assert_eq!(handle.snapshot().pattern(), "b");
        assert_eq!(handle.snapshot().generation(), 3);
    }

    #[test]
    fn failed_compile_leaves_handle_untouched() {
        let handle = FilterHandle::new(Filter::compile("ERROR").unwrap());
        assert!(Filter::compile("(broken").is_err());
        // The caller never got a filter to install; the active one survives.
        assert!(handle.matches(b"ERROR still here"));
        assert_eq!(handle.snapshot().generation(), 1);
    }
}
