//! Console log tailing
//!
//! The progressive text endpoint returns the log from a byte offset onward
//! and tells the client where to continue and whether more text may follow.

pub mod streamer;

use jenkins_trigger_domain::LogChunk;

pub use streamer::{LogStreamer, LogSummary};

/// Whether to back off before the next request.
///
/// Only an empty window from a log that is still growing warrants a delay;
/// otherwise the next window is requested immediately.
pub fn should_wait_before_next(chunk: &LogChunk) -> bool {
    chunk.is_empty() && chunk.more_data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, more_data: bool) -> LogChunk {
        LogChunk { data: text.as_bytes().to_vec(), next_offset: None, more_data }
    }

    #[test]
    fn test_waits_only_on_empty_growing_log() {
        assert!(should_wait_before_next(&chunk("", true)));
        assert!(!should_wait_before_next(&chunk("line\n", true)));
        assert!(!should_wait_before_next(&chunk("", false)));
        assert!(!should_wait_before_next(&chunk("tail\n", false)));
    }
}
