//! # Historical window scan.
//!
//! One forward pass over the source, retaining only the byte offsets of the
//! most recent `window` complete lines in a fixed-size ring. O(window)
//! memory, O(source size) time, no backward seeking during the pass.
//!
//! A trailing segment without a terminator is not part of the window: the
//! live phase resumes at the segment's start and completes the line once the
//! writer does.

use std::collections::VecDeque;
use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Result of the historical pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WindowPlan {
    /// Offset to resume reading from: the start of the oldest window line,
    /// or the position after the last complete line when the window is 0.
    pub resume: u64,
    /// Number of complete lines inside the window (≤ requested window).
    pub lines: usize,
}

/// Scans `reader` from its current position (expected: 0) to end-of-source.
///
/// `line_cap` bounds the scratch buffer; a longer line fails the scan with
/// `InvalidData`.
pub(crate) async fn scan<R>(
    reader: &mut R,
    window: usize,
    line_cap: Option<usize>,
) -> io::Result<WindowPlan>
where
    R: AsyncBufRead + Unpin,
{
    let mut starts: VecDeque<u64> = VecDeque::with_capacity(window.min(4096));
    let mut buf: Vec<u8> = Vec::new();
    let mut pos: u64 = 0;
    let mut after_last_line: u64 = 0;

    loop {
        let start = pos;
        let n = reader.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            break;
        }
        pos += n as u64;
        if let Some(cap) = line_cap {
            if buf.len() > cap {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("line exceeds {cap} bytes"),
                ));
            }
        }
        if buf.last() == Some(&b'\n') {
            after_last_line = pos;
            if window > 0 {
                if starts.len() == window {
                    starts.pop_front();
                }
                starts.push_back(start);
            }
        }
        buf.clear();
    }

    Ok(WindowPlan {
        resume: starts.front().copied().unwrap_or(after_last_line),
        lines: starts.len(),
    })
}
