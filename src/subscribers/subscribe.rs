//! # Core subscriber trait.
//!
//! `Subscribe` is the contract for event handlers driven by a dedicated
//! worker task fed from a [`Bus`](crate::events::Bus) receiver.
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching) — they do **not** block the
//!   publisher; a lagging worker observes `Lagged` and skips old events.
//! - `spawn_subscriber` owns the worker loop; it exits when the bus is
//!   dropped.

use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should
/// avoid blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Spawns a worker that feeds `subscriber` from `rx` until the bus closes.
///
/// Lagged receivers skip the missed events and continue; the worker never
/// crashes the session it observes.
pub fn spawn_subscriber<S: Subscribe>(
    mut rx: broadcast::Receiver<Event>,
    subscriber: S,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => subscriber.on_event(&ev).await,
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Bus, EventKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counter(Arc<AtomicUsize>);

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn worker_consumes_events_and_exits_on_close() {
        let bus = Bus::new(8);
        let seen = Arc::new(AtomicUsize::new(0));
        let worker = spawn_subscriber(bus.subscribe(), Counter(seen.clone()));

        bus.publish(Event::new(EventKind::SessionStarting));
        bus.publish(Event::new(EventKind::SessionClosed));
        drop(bus);

        worker.await.unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
