//! # Control reader: applies inbound filter updates.
//!
//! One of the two long-lived tasks of a session. It reads one frame at a
//! time from the inbound half of the duplex transport, decodes it as a
//! [`ControlMessage`], compiles the new pattern, and swaps it into the
//! shared [`FilterHandle`].
//!
//! ## Rules
//! - A decode failure or a compile failure is session-fatal: a malformed
//!   client message is a protocol violation the session cannot safely
//!   continue past. The previous filter is *not* silently kept.
//! - Clean EOF on the inbound side ends the session in an orderly way
//!   (outcome `Completed`): once the client can no longer send updates, the
//!   session's only remaining purpose is gone.
//! - The blocking `recv` is cancellable; a stop request wakes the loop
//!   within one cycle.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::SessionError;
use crate::events::{Bus, Event, EventKind};
use crate::filter::{Filter, FilterHandle};
use crate::session::TerminalOutcome;
use crate::wire::{ControlMessage, FrameSource};

/// Consumes control frames and replaces the session filter.
pub struct ControlReader<C> {
    control: C,
    filter: Arc<FilterHandle>,
    bus: Bus,
    session: Arc<str>,
}

impl<C> ControlReader<C>
where
    C: FrameSource,
{
    /// Creates a control reader for one session.
    pub fn new(control: C, filter: Arc<FilterHandle>, bus: Bus, session: Arc<str>) -> Self {
        Self {
            control,
            filter,
            bus,
            session,
        }
    }

    /// Runs until EOF, a protocol violation, or cancellation.
    ///
    /// The inbound half is dropped (closed) when this task returns; by then
    /// it has observably stopped.
    pub async fn run(mut self, token: CancellationToken) -> TerminalOutcome {
        loop {
            let frame = tokio::select! {
                _ = token.cancelled() => return TerminalOutcome::Cancelled,
                res = self.control.recv() => res,
            };
            let frame = match frame {
                Ok(Some(frame)) => frame,
                Ok(None) => return TerminalOutcome::Completed,
                Err(err) => {
                    return TerminalOutcome::Failed(SessionError::ControlDecode {
                        reason: err.to_string(),
                    })
                }
            };
            let msg: ControlMessage = match serde_json::from_slice(&frame) {
                Ok(msg) => msg,
                Err(err) => {
                    return TerminalOutcome::Failed(SessionError::ControlDecode {
                        reason: err.to_string(),
                    })
                }
            };
            let next = match Filter::compile(&msg.filter) {
                Ok(next) => next,
                Err(err) => return TerminalOutcome::Failed(err.into()),
            };
            self.filter.replace(next);
            self.bus.publish(
                Event::new(EventKind::FilterReplaced)
                    .with_session(self.session.clone())
                    .with_detail(msg.filter),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ChannelSource;
    use std::time::Duration;
    use tokio::time::timeout;

    fn shared_filter(pattern: &str) -> Arc<FilterHandle> {
        Arc::new(FilterHandle::new(Filter::compile(pattern).unwrap()))
    }

    #[tokio::test]
    async fn applies_filter_updates() {
        let (tx, source) = ChannelSource::new();
        let filter = shared_filter("");
        let bus = Bus::new(8);
        let mut events = bus.subscribe();
        let reader = ControlReader::new(source, filter.clone(), bus, Arc::from("s"));
        let handle = tokio::spawn(reader.run(CancellationToken::new()));

        tx.send(br#"{"Filter":"ERROR"}"#.to_vec()).unwrap();
        let ev = timeout(Duration::from_secs(5), events.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ev.kind, EventKind::FilterReplaced);
        assert_eq!(ev.detail.as_deref(), Some("ERROR"));
        assert!(filter.matches(b"an ERROR line"));
        assert!(!filter.matches(b"a quiet line"));

        drop(tx);
        assert_eq!(handle.await.unwrap(), TerminalOutcome::Completed);
    }

    #[tokio::test]
    async fn eof_completes_the_session() {
        let (tx, source) = ChannelSource::new();
        let reader = ControlReader::new(source, shared_filter(""), Bus::new(8), Arc::from("s"));
        let handle = tokio::spawn(reader.run(CancellationToken::new()));
        drop(tx);
        assert_eq!(handle.await.unwrap(), TerminalOutcome::Completed);
    }

    #[tokio::test]
    async fn malformed_frame_is_fatal() {
        let (tx, source) = ChannelSource::new();
        let reader = ControlReader::new(source, shared_filter(""), Bus::new(8), Arc::from("s"));
        let handle = tokio::spawn(reader.run(CancellationToken::new()));

        tx.send(b"not json at all".to_vec()).unwrap();
        let outcome = handle.await.unwrap();
        assert!(matches!(
            outcome,
            TerminalOutcome::Failed(SessionError::ControlDecode { .. })
        ));
    }

    #[tokio::test]
    async fn bad_pattern_is_fatal_and_keeps_nothing() {
        let (tx, source) = ChannelSource::new();
        let filter = shared_filter("ERROR");
        let reader = ControlReader::new(source, filter.clone(), Bus::new(8), Arc::from("s"));
        let handle = tokio::spawn(reader.run(CancellationToken::new()));

        tx.send(br#"{"Filter":"(unclosed"}"#.to_vec()).unwrap();
        let outcome = handle.await.unwrap();
        assert!(matches!(
            outcome,
            TerminalOutcome::Failed(SessionError::FilterCompile { .. })
        ));
        // The active filter was never corrupted.
        assert!(filter.matches(b"ERROR"));
        assert_eq!(filter.snapshot().generation(), 1);
    }

    #[tokio::test]
    async fn cancellation_wakes_a_blocked_recv() {
        let (_tx, source) = ChannelSource::new();
        let reader = ControlReader::new(source, shared_filter(""), Bus::new(8), Arc::from("s"));
        let token = CancellationToken::new();
        let handle = tokio::spawn(reader.run(token.clone()));

        token.cancel();
        let outcome = timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
        assert_eq!(outcome, TerminalOutcome::Cancelled);
    }
}
