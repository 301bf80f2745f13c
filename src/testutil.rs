//! In-memory doubles shared by the unit tests: a growable byte source that
//! behaves like an appended-to log file, and channel-backed transport halves.

use std::io::{self, SeekFrom};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncSeek, ReadBuf};
use tokio::sync::mpsc;

use crate::wire::{FrameSink, FrameSource};

/// A shared byte buffer standing in for a growing log file.
#[derive(Clone)]
pub(crate) struct SharedLog {
    data: Arc<Mutex<Vec<u8>>>,
}

impl SharedLog {
    pub fn new(initial: &[u8]) -> Self {
        Self {
            data: Arc::new(Mutex::new(initial.to_vec())),
        }
    }

    /// Appends bytes, as a log writer would.
    pub fn append(&self, bytes: &[u8]) {
        self.data.lock().unwrap().extend_from_slice(bytes);
    }

    /// Opens an independent read handle positioned at offset 0.
    pub fn reader(&self) -> SharedLogReader {
        SharedLogReader {
            data: self.data.clone(),
            pos: 0,
            pending_seek: None,
        }
    }
}

/// Read handle over a [`SharedLog`]. Reads past the current end return 0
/// bytes (EOF), and later reads observe appended data, like a real file.
pub(crate) struct SharedLogReader {
    data: Arc<Mutex<Vec<u8>>>,
    pos: u64,
    pending_seek: Option<SeekFrom>,
}

impl AsyncRead for SharedLogReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let me = self.get_mut();
        let data = me.data.lock().unwrap();
        let pos = me.pos as usize;
        if pos < data.len() {
            let n = buf.remaining().min(data.len() - pos);
            buf.put_slice(&data[pos..pos + n]);
            me.pos += n as u64;
        }
        Poll::Ready(Ok(()))
    }
}

impl AsyncSeek for SharedLogReader {
    fn start_seek(self: Pin<&mut Self>, position: SeekFrom) -> io::Result<()> {
        self.get_mut().pending_seek = Some(position);
        Ok(())
    }

    fn poll_complete(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<u64>> {
        let me = self.get_mut();
        if let Some(target) = me.pending_seek.take() {
            let len = me.data.lock().unwrap().len() as i64;
            let abs = match target {
                SeekFrom::Start(o) => o as i64,
                SeekFrom::End(o) => len + o,
                SeekFrom::Current(o) => me.pos as i64 + o,
            };
            if abs < 0 {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "seek before start",
                )));
            }
            me.pos = abs as u64;
        }
        Poll::Ready(Ok(me.pos))
    }
}

/// Outbound half backed by an unbounded channel; dropping the receiver makes
/// subsequent sends fail like a closed transport.
pub(crate) struct ChannelSink {
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Vec<u8>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl FrameSink for ChannelSink {
    async fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        self.tx
            .send(frame.to_vec())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "sink receiver dropped"))
    }
}

/// Inbound half backed by an unbounded channel; dropping the sender is a
/// clean EOF.
pub(crate) struct ChannelSource {
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

impl ChannelSource {
    pub fn new() -> (mpsc::UnboundedSender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }
}

#[async_trait]
impl FrameSource for ChannelSource {
    async fn recv(&mut self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.rx.recv().await)
    }
}
