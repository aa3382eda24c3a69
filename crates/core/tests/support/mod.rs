//! Shared test helpers for `jenkins-trigger-core` integration tests.
//!
//! Provides a scripted in-memory build server and a sleeper that records
//! requested delays instead of waiting, so poll loops run deterministically.

#![allow(dead_code)]

pub mod fixtures;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jenkins_trigger_core::{JenkinsApi, PollContext, Sleeper};
use jenkins_trigger_domain::{
    Build, JobParameters, LogChunk, QueuedItem, Result, TriggerError,
};
use tokio_util::sync::CancellationToken;

/// One request observed by [`ScriptedJenkins`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Trigger { job_url: String, parameters: JobParameters },
    QueuedItem(String),
    Build(String),
    LogChunk { build_url: String, offset: u64 },
}

/// In-memory `JenkinsApi` that replays scripted responses in order.
///
/// Each endpoint has its own script. An exhausted script answers with a
/// transport error so a runaway loop fails the test instead of hanging it.
#[derive(Default)]
pub struct ScriptedJenkins {
    triggers: Mutex<VecDeque<Result<Option<String>>>>,
    queue: Mutex<VecDeque<Result<QueuedItem>>>,
    builds: Mutex<VecDeque<Result<Build>>>,
    logs: Mutex<VecDeque<Result<LogChunk>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedJenkins {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trigger(self, response: Result<Option<String>>) -> Self {
        self.triggers.lock().unwrap().push_back(response);
        self
    }

    pub fn with_queue_items(self, responses: impl IntoIterator<Item = Result<QueuedItem>>) -> Self {
        self.queue.lock().unwrap().extend(responses);
        self
    }

    pub fn with_builds(self, responses: impl IntoIterator<Item = Result<Build>>) -> Self {
        self.builds.lock().unwrap().extend(responses);
        self
    }

    pub fn with_log_chunks(self, responses: impl IntoIterator<Item = Result<LogChunk>>) -> Self {
        self.logs.lock().unwrap().extend(responses);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn queue_polls(&self) -> usize {
        self.calls().iter().filter(|call| matches!(call, Call::QueuedItem(_))).count()
    }

    pub fn build_polls(&self) -> usize {
        self.calls().iter().filter(|call| matches!(call, Call::Build(_))).count()
    }

    /// Offsets requested from the progressive text endpoint, in order.
    pub fn log_offsets(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::LogChunk { offset, .. } => Some(offset),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn next<T>(script: &Mutex<VecDeque<Result<T>>>, endpoint: &str) -> Result<T> {
    script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(TriggerError::Transport(format!("{endpoint} script exhausted"))))
}

#[async_trait]
impl JenkinsApi for ScriptedJenkins {
    async fn trigger_build(
        &self,
        job_url: &str,
        parameters: &JobParameters,
    ) -> Result<Option<String>> {
        self.record(Call::Trigger { job_url: job_url.to_string(), parameters: parameters.clone() });
        next(&self.triggers, "trigger")
    }

    async fn queued_item(&self, item_url: &str) -> Result<QueuedItem> {
        self.record(Call::QueuedItem(item_url.to_string()));
        next(&self.queue, "queue")
    }

    async fn build(&self, build_url: &str) -> Result<Build> {
        self.record(Call::Build(build_url.to_string()));
        next(&self.builds, "build")
    }

    async fn log_chunk(&self, build_url: &str, offset: u64) -> Result<LogChunk> {
        self.record(Call::LogChunk { build_url: build_url.to_string(), offset });
        next(&self.logs, "log")
    }
}

/// Sleeper that returns immediately and remembers every requested delay.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
    cancel_after: Mutex<Option<(usize, CancellationToken)>>,
}

impl RecordingSleeper {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Cancel `token` once `sleeps` delays have been requested.
    pub fn cancelling_after(sleeps: usize, token: CancellationToken) -> Arc<Self> {
        let sleeper = Self::default();
        *sleeper.cancel_after.lock().unwrap() = Some((sleeps, token));
        Arc::new(sleeper)
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.delays.lock().unwrap().len()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        let count = {
            let mut delays = self.delays.lock().unwrap();
            delays.push(duration);
            delays.len()
        };
        if let Some((after, token)) = self.cancel_after.lock().unwrap().as_ref() {
            if count >= *after {
                token.cancel();
            }
        }
    }
}

/// Poll context backed by `sleeper`, never cancelled.
pub fn poll_context(sleeper: &Arc<RecordingSleeper>) -> PollContext {
    PollContext::new(Arc::clone(sleeper) as Arc<dyn Sleeper>)
}
