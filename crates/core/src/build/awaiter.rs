//! Build awaiter poll loop

use std::sync::Arc;
use std::time::Duration;

use jenkins_trigger_domain::constants::DEFAULT_BUILD_POLL_INTERVAL_MS;
use jenkins_trigger_domain::{Build, Result};
use tracing::{debug, info, instrument};

use super::{evaluate_build, BuildStatus};
use crate::poll::PollContext;
use crate::ports::JenkinsApi;

/// Polls a build until it reports a terminal result.
pub struct BuildAwaiter {
    api: Arc<dyn JenkinsApi>,
    poll: PollContext,
    interval: Duration,
}

impl BuildAwaiter {
    pub fn new(api: Arc<dyn JenkinsApi>) -> Self {
        Self {
            api,
            poll: PollContext::default(),
            interval: Duration::from_millis(DEFAULT_BUILD_POLL_INTERVAL_MS),
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

    /// Wait until the build at `build_url` stops building with a result.
    ///
    /// The returned build always has `building == false` and a result.
    ///
    /// # Errors
    /// - `TriggerError::UnknownResult` if the server reports a result outside
    ///   the known set
    /// - `TriggerError::Cancelled` if the cancellation token fires
    /// - any transport or rejection error from a fetch
    #[instrument(skip(self))]
    pub async fn await_completion(&self, build_url: &str) -> Result<Build> {
        let mut attempt: u32 = 1;
        let mut build = self.fetch(build_url).await?;

        loop {
            match evaluate_build(&build) {
                BuildStatus::Finished(result) => {
                    info!(attempts = attempt, %result, number = ?build.number, "Build completed");
                    return Ok(build);
                }
                BuildStatus::Running => {
                    debug!(attempt, building = build.building, "Waiting for build to complete");
                    self.poll.pause(self.interval).await?;
                    build = self.fetch(build_url).await?;
                    attempt = attempt.saturating_add(1);
                }
            }
        }
    }

    async fn fetch(&self, build_url: &str) -> Result<Build> {
        self.poll.run(self.api.build(build_url)).await
    }
}
