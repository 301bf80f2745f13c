//! # Wire messages and transport traits.
//!
//! The session core never touches a concrete transport. The external
//! connection layer (HTTP upgrade, authentication) hands in two trait
//! objects: a [`FrameSink`] for the outbound side and a [`FrameSource`] for
//! the inbound side of the duplex connection.
//!
//! ## Frames on the wire
//! - Outbound data: one frame per matching log line, raw line bytes, no
//!   added metadata.
//! - Outbound terminal error (at most one, last frame before close):
//!   `{"Error":{"Message":"<string>"}}`.
//! - Inbound control update: `{"Filter":"<string>"}`, zero or more, at any
//!   time while streaming.
//!
//! No other message types are defined.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Inbound control update: replaces the session's active filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMessage {
    /// The new filter pattern; empty means match everything.
    #[serde(rename = "Filter")]
    pub filter: String,
}

/// Outbound terminal error frame, sent at most once before close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorFrame {
    /// The error payload.
    #[serde(rename = "Error")]
    pub error: ErrorBody,
}

/// Payload of an [`ErrorFrame`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    #[serde(rename = "Message")]
    pub message: String,
}

impl ErrorFrame {
    /// Builds an error frame carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
            },
        }
    }
}

/// # Outbound half of the duplex transport.
///
/// One `send` call per frame. The implementation decides the physical framing
/// (websocket message, length-prefixed chunk, ...). A failed send is
/// session-fatal; the core never retries.
#[async_trait]
pub trait FrameSink: Send {
    /// Sends one frame. Must not buffer across session teardown.
    async fn send(&mut self, frame: &[u8]) -> std::io::Result<()>;
}

/// # Inbound half of the duplex transport.
///
/// Yields one raw frame at a time; `Ok(None)` is a clean EOF (the client
/// closed its sending side). A transport error is session-fatal.
#[async_trait]
pub trait FrameSource: Send {
    /// Receives the next frame, or `None` on clean EOF.
    async fn recv(&mut self) -> std::io::Result<Option<Vec<u8>>>;
}
