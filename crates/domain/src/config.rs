//! Configuration management

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BUILD_POLL_INTERVAL_MS, DEFAULT_LOG_POLL_INTERVAL_MS, DEFAULT_QUEUE_POLL_INTERVAL_MS,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::errors::{Result, TriggerError};
use crate::types::JobParameters;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub endpoint: EndpointConfig,
    pub job: JobConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Server location, credentials and TLS client material.
///
/// `client_cert` and `client_key` hold either inline PEM text or a path to a
/// PEM file. The client identity is only used when both are present.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(default)]
    pub client_cert: Option<String>,
    #[serde(skip_serializing, default)]
    pub client_key: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// Hand-written so secrets never reach a log line.
impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_cert", &self.client_cert.as_ref().map(|_| "<set>"))
            .field("client_key", &self.client_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl EndpointConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            client_cert: None,
            client_key: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    pub fn with_client_identity(mut self, cert: impl Into<String>, key: impl Into<String>) -> Self {
        self.client_cert = Some(cert.into());
        self.client_key = Some(key.into());
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// The job to trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Absolute job URL or a path relative to the endpoint.
    pub job_url: String,
    #[serde(default)]
    pub parameters: JobParameters,
    #[serde(default = "default_stream_log")]
    pub stream_log: bool,
}

/// Poll cadence and the optional overall deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_queue_interval_ms")]
    pub queue_interval_ms: u64,
    #[serde(default = "default_build_interval_ms")]
    pub build_interval_ms: u64,
    #[serde(default = "default_log_interval_ms")]
    pub log_interval_ms: u64,
    #[serde(default)]
    pub overall_timeout_secs: Option<u64>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            queue_interval_ms: DEFAULT_QUEUE_POLL_INTERVAL_MS,
            build_interval_ms: DEFAULT_BUILD_POLL_INTERVAL_MS,
            log_interval_ms: DEFAULT_LOG_POLL_INTERVAL_MS,
            overall_timeout_secs: None,
        }
    }
}

impl PollingConfig {
    pub fn queue_interval(&self) -> Duration {
        Duration::from_millis(self.queue_interval_ms)
    }

    pub fn build_interval(&self) -> Duration {
        Duration::from_millis(self.build_interval_ms)
    }

    pub fn log_interval(&self) -> Duration {
        Duration::from_millis(self.log_interval_ms)
    }

    pub fn overall_timeout(&self) -> Option<Duration> {
        self.overall_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Reject configurations that cannot possibly reach a server.
    ///
    /// # Errors
    /// Returns `TriggerError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let base_url = self.endpoint.base_url.trim();
        if base_url.is_empty() {
            return Err(TriggerError::Config("endpoint.base_url is empty".into()));
        }
        let Some(rest) =
            base_url.strip_prefix("https://").or_else(|| base_url.strip_prefix("http://"))
        else {
            return Err(TriggerError::Config(format!(
                "endpoint.base_url must be an absolute http(s) URL: {base_url}"
            )));
        };
        if !has_host(rest) {
            return Err(TriggerError::Config(format!(
                "endpoint.base_url has no host: {base_url}"
            )));
        }
        if self.endpoint.username.trim().is_empty() {
            return Err(TriggerError::Config("endpoint.username is empty".into()));
        }
        if self.job.job_url.trim().is_empty() {
            return Err(TriggerError::Config("job.job_url is empty".into()));
        }
        if self.endpoint.request_timeout_secs == 0 {
            return Err(TriggerError::Config("endpoint.request_timeout_secs must be > 0".into()));
        }

        let intervals = [
            ("polling.queue_interval_ms", self.polling.queue_interval_ms),
            ("polling.build_interval_ms", self.polling.build_interval_ms),
            ("polling.log_interval_ms", self.polling.log_interval_ms),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, value)| *value == 0) {
            return Err(TriggerError::Config(format!("{name} must be > 0")));
        }

        Ok(())
    }
}

/// Whether the part of a URL after `scheme://` names a host.
///
/// Full parsing happens when the sanitizer is built; this only catches URLs
/// with an empty authority such as `https://` or `https:///jenkins`.
fn has_host(after_scheme: &str) -> bool {
    let authority = after_scheme.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host = if host_port.starts_with('[') {
        host_port.split_inclusive(']').next().unwrap_or_default()
    } else {
        host_port.split(':').next().unwrap_or_default()
    };
    !host.trim_matches(['[', ']']).is_empty()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_stream_log() -> bool {
    true
}

fn default_queue_interval_ms() -> u64 {
    DEFAULT_QUEUE_POLL_INTERVAL_MS
}

fn default_build_interval_ms() -> u64 {
    DEFAULT_BUILD_POLL_INTERVAL_MS
}

fn default_log_interval_ms() -> u64 {
    DEFAULT_LOG_POLL_INTERVAL_MS
}
