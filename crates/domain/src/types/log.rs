//! Progressive text log types

use serde::Serialize;

/// One window of the progressive text log.
///
/// Offsets count bytes and a window may end inside a multibyte character,
/// so the body is kept as received and never decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogChunk {
    pub data: Vec<u8>,
    /// Offset reported by the server for the next request (`x-text-size`).
    pub next_offset: Option<u64>,
    /// Whether the server may still produce more text (`x-more-data`).
    pub more_data: bool,
}

impl LogChunk {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Window length in bytes.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Client-side tailing progress. Reset for each tailing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogCursor {
    offset: u64,
    more_data: bool,
}

impl Default for LogCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl LogCursor {
    /// Cursor at offset zero, expecting data.
    pub const fn new() -> Self {
        Self { offset: 0, more_data: true }
    }

    pub const fn offset(&self) -> u64 {
        self.offset
    }

    pub const fn has_more(&self) -> bool {
        self.more_data
    }

    /// Move past a received chunk.
    ///
    /// The server-reported offset wins; without one the cursor advances by the
    /// chunk's byte length. The offset never moves backwards.
    pub fn advance(&mut self, chunk: &LogChunk) {
        let fallback = self.offset.saturating_add(chunk.len());
        let reported = chunk.next_offset.unwrap_or(fallback);
        self.offset = self.offset.max(reported);
        self.more_data = chunk.more_data;
    }
}
