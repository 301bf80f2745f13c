//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by streaming sessions.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `SessionSupervisor`, `Tailer`, `ControlReader`.
//! - **Consumers**: whatever the embedding server wires up — a
//!   [`Subscribe`](crate::Subscribe) implementation via
//!   [`spawn_subscriber`](crate::subscribers::spawn_subscriber), or a raw
//!   `bus.subscribe()` receiver.
//!
//! The bus is injected into the supervisor at construction; there is no
//! process-global logging singleton.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
