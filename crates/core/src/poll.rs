//! Suspension points shared by the poll loops
//!
//! Every poll loop suspends in exactly two places: while a request is in
//! flight and while waiting between requests. Both race the cancellation
//! token so an outer deadline can stop an otherwise unbounded loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use jenkins_trigger_domain::{Result, TriggerError};
use tokio_util::sync::CancellationToken;

use crate::ports::{Sleeper, TokioSleeper};

/// Delay primitive plus cancellation input for one poll loop.
#[derive(Clone)]
pub struct PollContext {
    sleeper: Arc<dyn Sleeper>,
    cancel: CancellationToken,
}

impl Default for PollContext {
    fn default() -> Self {
        Self::new(Arc::new(TokioSleeper))
    }
}

impl std::fmt::Debug for PollContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollContext").field("cancelled", &self.cancel.is_cancelled()).finish()
    }
}

impl PollContext {
    /// Context that is never cancelled unless a token is attached.
    pub fn new(sleeper: Arc<dyn Sleeper>) -> Self {
        Self { sleeper, cancel: CancellationToken::new() }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Drive `operation` to completion unless cancellation fires first.
    ///
    /// # Errors
    /// Returns `TriggerError::Cancelled` if the token is or becomes
    /// cancelled, otherwise whatever `operation` returns.
    pub async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.cancel.is_cancelled() {
            return Err(TriggerError::Cancelled);
        }

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(TriggerError::Cancelled),
            result = operation => result,
        }
    }

    /// Wait `interval` between two poll iterations.
    ///
    /// # Errors
    /// Returns `TriggerError::Cancelled` if cancellation fires first.
    pub async fn pause(&self, interval: Duration) -> Result<()> {
        let sleeper = Arc::clone(&self.sleeper);
        self.run(async move {
            sleeper.sleep(interval).await;
            Ok(())
        })
        .await
    }
}
