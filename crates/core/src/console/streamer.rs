//! Log streamer poll loop

use std::sync::Arc;
use std::time::Duration;

use jenkins_trigger_domain::constants::DEFAULT_LOG_POLL_INTERVAL_MS;
use jenkins_trigger_domain::{LogCursor, Result, TriggerError};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument};

use super::should_wait_before_next;
use crate::poll::PollContext;
use crate::ports::JenkinsApi;

/// Totals for one tailing session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogSummary {
    /// Bytes written to the output.
    pub bytes_written: u64,
    /// Requests made to the progressive text endpoint.
    pub requests: u32,
    /// Offset the cursor stopped at.
    pub final_offset: u64,
}

/// Tails a build's progressive text log into a writer.
pub struct LogStreamer {
    api: Arc<dyn JenkinsApi>,
    poll: PollContext,
    interval: Duration,
}

impl LogStreamer {
    pub fn new(api: Arc<dyn JenkinsApi>) -> Self {
        Self {
            api,
            poll: PollContext::default(),
            interval: Duration::from_millis(DEFAULT_LOG_POLL_INTERVAL_MS),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_poll_context(mut self, poll: PollContext) -> Self {
        self.poll = poll;
        self
    }

    /// Copy the build log into `writer` until the server reports no more data.
    ///
    /// Each byte range is requested once and written once, in order, exactly
    /// as the server sent it. The
    /// loop ends on the server's signal alone, so it keeps draining after the
    /// build itself has finished.
    ///
    /// # Errors
    /// - `TriggerError::Output` if writing to `writer` fails
    /// - `TriggerError::Cancelled` if the cancellation token fires
    /// - any transport or rejection error from a fetch
    #[instrument(skip(self, writer))]
    pub async fn stream<W>(&self, build_url: &str, writer: &mut W) -> Result<LogSummary>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let mut cursor = LogCursor::new();
        let mut summary = LogSummary::default();

        while cursor.has_more() {
            let chunk = self.poll.run(self.api.log_chunk(build_url, cursor.offset())).await?;
            summary.requests = summary.requests.saturating_add(1);

            if !chunk.is_empty() {
                writer.write_all(&chunk.data).await.map_err(output_error)?;
                writer.flush().await.map_err(output_error)?;
                summary.bytes_written = summary.bytes_written.saturating_add(chunk.len());
            }

            cursor.advance(&chunk);
            debug!(
                offset = cursor.offset(),
                chunk_bytes = chunk.len(),
                more_data = cursor.has_more(),
                "Received console log window"
            );

            if should_wait_before_next(&chunk) {
                self.poll.pause(self.interval).await?;
            }
        }

        summary.final_offset = cursor.offset();
        info!(
            bytes = summary.bytes_written,
            requests = summary.requests,
            "Console log fully streamed"
        );
        Ok(summary)
    }
}

fn output_error(err: std::io::Error) -> TriggerError {
    TriggerError::Output(err.to_string())
}
