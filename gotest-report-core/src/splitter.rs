// Copyright (c) The gotest-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Splitting an ordered sequence of byte chunks into complete lines.

use bytes::BytesMut;

/// Turns byte chunks into newline-terminated lines, with no loss or
/// duplication across chunk boundaries.
///
/// Each stream gets its own splitter; the pending buffer is owned by this
/// instance and never shared. A line that spans several chunks is emitted
/// exactly once, after the chunk carrying its terminator arrives.
#[derive(Debug, Default)]
pub struct LineSplitter {
    pending: BytesMut,
}

impl LineSplitter {
    /// Creates a new splitter with an empty pending buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one chunk and returns every line it completes, in order.
    ///
    /// The returned lines do not include the `\n` terminator. Bytes after the
    /// last terminator stay buffered for the next chunk.
    pub fn accept(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line = self.pending.split_to(pos + 1);
            line.truncate(pos);
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Signals end-of-stream, returning the trailing unterminated line if one
    /// is buffered.
    ///
    /// A test process's last line is not guaranteed to end with a terminator
    /// before exit, so the remainder is emitted rather than dropped.
    pub fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        Some(String::from_utf8_lossy(&self.pending).into_owned())
    }
}
