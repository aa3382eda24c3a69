//! Tracing subscriber setup
//!
//! Diagnostics go to stderr so stdout stays reserved for the build console
//! log and the result lines.

use std::io;
use std::str::FromStr;

use jenkins_trigger_domain::{Result, TriggerError};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Output format of diagnostic logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable single-line records.
    #[default]
    Text,
    /// Newline-delimited JSON records.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

/// Install the global subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info`.
///
/// # Errors
/// Returns `TriggerError::Config` if `RUST_LOG` does not parse or a global
/// subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)
            .map_err(|err| TriggerError::Config(format!("invalid RUST_LOG: {err}")))?,
        _ => EnvFilter::new(DEFAULT_FILTER),
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(false)
                    .with_span_events(FmtSpan::NONE),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_current_span(true),
            )
            .try_init(),
    };

    installed
        .map_err(|err| TriggerError::Config(format!("failed to install tracing subscriber: {err}")))
}
