//! # Event subscribers.
//!
//! `Subscribe` is the extension point for plugging custom event handlers
//! (structured logging, metrics, auditing) into a server embedding this
//! crate. Subscribers consume the injected [`Bus`](crate::events::Bus); the
//! session core itself never logs to a global sink.
//!
//! ## Contents
//! - [`Subscribe`] the subscriber contract
//! - [`spawn_subscriber`] drives one subscriber from a bus receiver
//! - [`LogWriter`] simple stdout subscriber (feature `logging`)

#[cfg(feature = "logging")]
mod log;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscribe::{spawn_subscriber, Subscribe};
