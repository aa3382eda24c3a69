//! Queue resolver poll loop

use std::sync::Arc;
use std::time::Duration;

use jenkins_trigger_domain::constants::DEFAULT_QUEUE_POLL_INTERVAL_MS;
use jenkins_trigger_domain::{QueuedItem, Result, TriggerError};
use tracing::{debug, info, instrument};

use super::{evaluate_queued_item, QueueStatus};
use crate::poll::PollContext;
use crate::ports::JenkinsApi;
use crate::sanitizer::UrlSanitizer;

/// Polls a queued item until the server assigns it a build.
pub struct QueueResolver {
    api: Arc<dyn JenkinsApi>,
    sanitizer: UrlSanitizer,
    poll: PollContext,
    interval: Duration,
}

impl QueueResolver {
    pub fn new(api: Arc<dyn JenkinsApi>, sanitizer: UrlSanitizer) -> Self {
        Self {
            api,
            sanitizer,
            poll: PollContext::default(),
            interval: Duration::from_millis(DEFAULT_QUEUE_POLL_INTERVAL_MS),
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

    /// Wait for the queued item to be bound to a build and return the
    /// sanitized build URL.
    ///
    /// The loop is unbounded; attach a cancellation token through
    /// [`QueueResolver::with_poll_context`] to bound it.
    ///
    /// # Errors
    /// - `TriggerError::LostTrackOfBuild` if the item stops waiting without
    ///   an executable URL (e.g. it was cancelled server-side)
    /// - `TriggerError::Cancelled` if the cancellation token fires
    /// - any transport, rejection or decoding error from a fetch
    #[instrument(skip(self))]
    pub async fn resolve(&self, queued_item_url: &str) -> Result<String> {
        let mut attempt: u32 = 1;
        let mut item = self.fetch(queued_item_url).await?;

        while evaluate_queued_item(&item) == QueueStatus::Waiting {
            debug!(
                attempt,
                blocked = item.blocked,
                buildable = item.buildable,
                stuck = item.stuck,
                why = item.why.as_deref().unwrap_or_default(),
                "Waiting for queued item to be assigned an executor"
            );
            self.poll.pause(self.interval).await?;
            item = self.fetch(queued_item_url).await?;
            attempt = attempt.saturating_add(1);
        }

        let Some(executable_url) = item.executable_url() else {
            let reason = if item.is_cancelled() {
                "queued item was cancelled"
            } else {
                "queued item left the queue without an executable"
            };
            return Err(TriggerError::LostTrackOfBuild {
                queue_url: queued_item_url.to_string(),
                reason: reason.to_string(),
            });
        };

        let build_url = self.sanitizer.sanitize(executable_url)?;
        info!(attempts = attempt, %build_url, "Queued item resolved to build");
        Ok(build_url)
    }

    async fn fetch(&self, queued_item_url: &str) -> Result<QueuedItem> {
        self.poll.run(self.api.queued_item(queued_item_url)).await
    }
}
