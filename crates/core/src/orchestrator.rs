//! Build orchestrator - submit, resolve, await
//!
//! Composes the URL sanitizer, queue resolver, build awaiter and log
//! streamer into the operations exposed to the outer command layer.

use std::sync::Arc;

use jenkins_trigger_domain::{
    Build, BuildOutcome, JobParameters, PollingConfig, Result, TriggerError,
};
use tokio::io::AsyncWrite;
use tracing::{info, instrument};

use crate::build::BuildAwaiter;
use crate::console::{LogStreamer, LogSummary};
use crate::poll::PollContext;
use crate::ports::JenkinsApi;
use crate::queue::QueueResolver;
use crate::sanitizer::UrlSanitizer;

/// Drives one logical job from trigger to terminal result.
pub struct BuildOrchestrator {
    api: Arc<dyn JenkinsApi>,
    sanitizer: UrlSanitizer,
    poll: PollContext,
    resolver: QueueResolver,
    awaiter: BuildAwaiter,
    streamer: LogStreamer,
}

impl BuildOrchestrator {
    /// Orchestrator with default poll intervals and no cancellation.
    pub fn new(api: Arc<dyn JenkinsApi>, sanitizer: UrlSanitizer) -> Self {
        Self::with_settings(api, sanitizer, &PollingConfig::default(), PollContext::default())
    }

    /// Orchestrator whose every stage uses `polling` intervals and `poll`
    /// for delays and cancellation.
    pub fn with_settings(
        api: Arc<dyn JenkinsApi>,
        sanitizer: UrlSanitizer,
        polling: &PollingConfig,
        poll: PollContext,
    ) -> Self {
        let resolver = QueueResolver::new(Arc::clone(&api), sanitizer.clone())
            .with_interval(polling.queue_interval())
            .with_poll_context(poll.clone());
        let awaiter = BuildAwaiter::new(Arc::clone(&api))
            .with_interval(polling.build_interval())
            .with_poll_context(poll.clone());
        let streamer = LogStreamer::new(Arc::clone(&api))
            .with_interval(polling.log_interval())
            .with_poll_context(poll.clone());

        Self { api, sanitizer, poll, resolver, awaiter, streamer }
    }

    /// Trigger a build of `job_url` and return the sanitized queued-item URL.
    ///
    /// `job_url` may be absolute or relative to the configured endpoint.
    ///
    /// # Errors
    /// - `TriggerError::MissingLocation` if the response has no `Location`
    /// - `TriggerError::MalformedUrl` if the job or location URL is unusable
    /// - any transport or rejection error from the trigger request
    #[instrument(skip(self, parameters), fields(parameter_count = parameters.len()))]
    pub async fn submit(&self, job_url: &str, parameters: &JobParameters) -> Result<String> {
        let job_url = self.sanitizer.resolve(job_url)?;
        let location = self
            .poll
            .run(self.api.trigger_build(&job_url, parameters))
            .await?
            .ok_or(TriggerError::MissingLocation)?;

        let queued_item_url = self.sanitizer.resolve(&location)?;
        info!(%queued_item_url, "Build queued");
        Ok(queued_item_url)
    }

    /// Resolve a queued-item URL into the sanitized URL of its build.
    pub async fn resolve(&self, queued_item_url: &str) -> Result<String> {
        self.resolver.resolve(queued_item_url).await
    }

    /// Wait for the build at `build_url` to reach a terminal result.
    pub async fn await_build(&self, build_url: &str) -> Result<Build> {
        self.awaiter.await_completion(build_url).await
    }

    /// Tail the build log at `build_url` into `writer` until it is exhausted.
    pub async fn stream_log<W>(&self, build_url: &str, writer: &mut W) -> Result<LogSummary>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        self.streamer.stream(build_url, writer).await
    }

    /// Submit, resolve and await a build.
    ///
    /// # Errors
    /// Any error surfaced by one of the stages aborts the whole operation.
    pub async fn submit_and_await(
        &self,
        job_url: &str,
        parameters: &JobParameters,
    ) -> Result<BuildOutcome> {
        let queued_item_url = self.submit(job_url, parameters).await?;
        let build_url = self.resolve(&queued_item_url).await?;
        let build = self.await_build(&build_url).await?;
        into_outcome(build, build_url)
    }

    /// Like [`BuildOrchestrator::submit_and_await`], tailing the build log
    /// into `writer` while the build runs.
    ///
    /// Awaiting and streaming run concurrently and share nothing. The call
    /// returns once both are done, so the log drains after completion; the
    /// first error from either aborts both.
    pub async fn submit_and_await_with_log<W>(
        &self,
        job_url: &str,
        parameters: &JobParameters,
        writer: &mut W,
    ) -> Result<(BuildOutcome, LogSummary)>
    where
        W: AsyncWrite + Unpin + Send + ?Sized,
    {
        let queued_item_url = self.submit(job_url, parameters).await?;
        let build_url = self.resolve(&queued_item_url).await?;

        let (build, summary) =
            tokio::try_join!(self.await_build(&build_url), self.stream_log(&build_url, writer))?;

        Ok((into_outcome(build, build_url)?, summary))
    }
}

fn into_outcome(build: Build, build_url: String) -> Result<BuildOutcome> {
    let result = build
        .terminal_result()
        .ok_or_else(|| TriggerError::Decode("finished build carried no result".into()))?;
    Ok(BuildOutcome { result, build_url, number: build.number })
}
