//! Port interfaces for talking to the build server
//!
//! These traits define the boundaries between the protocol logic in this
//! crate and the infrastructure that performs HTTP and timing.

use std::time::Duration;

use async_trait::async_trait;
use jenkins_trigger_domain::{Build, JobParameters, LogChunk, QueuedItem, Result};

/// Remote build server operations used by the protocol state machines.
///
/// Every URL handed to an implementation is absolute and has already been
/// sanitized against the configured endpoint.
#[async_trait]
pub trait JenkinsApi: Send + Sync {
    /// POST the build trigger for a job.
    ///
    /// Returns the raw `Location` header of the response, `None` if the
    /// server did not send one.
    async fn trigger_build(&self, job_url: &str, parameters: &JobParameters)
        -> Result<Option<String>>;

    /// GET `{item_url}/api/json`.
    async fn queued_item(&self, item_url: &str) -> Result<QueuedItem>;

    /// GET `{build_url}/api/json`.
    async fn build(&self, build_url: &str) -> Result<Build>;

    /// GET `{build_url}/logText/progressiveText?start={offset}`.
    async fn log_chunk(&self, build_url: &str, offset: u64) -> Result<LogChunk>;
}

/// Delay primitive used between poll iterations.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
