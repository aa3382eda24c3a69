//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! The result is validated before it is returned.
//!
//! ## Environment Variables
//! - `JENKINS_URL`: Base URL of the server (required)
//! - `JENKINS_USERNAME`: Basic auth user (required)
//! - `JENKINS_PASSWORD`: Basic auth password or API token (required)
//! - `JENKINS_JOB_URL`: Job URL, absolute or relative to `JENKINS_URL`
//!   (required)
//! - `JENKINS_JOB_PARAMETERS`: JSON object of build parameters
//! - `JENKINS_CLIENT_CERT` / `JENKINS_CLIENT_KEY`: PEM text or PEM file path
//! - `JENKINS_REQUEST_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `JENKINS_QUEUE_POLL_MS`, `JENKINS_BUILD_POLL_MS`, `JENKINS_LOG_POLL_MS`:
//!   Poll intervals in milliseconds
//! - `JENKINS_TIMEOUT_SECS`: Overall deadline in seconds
//! - `JENKINS_STREAM_LOG`: Whether to tail the console log (true/false)
//!
//! Optional variables that are set but empty count as unset.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./jenkins-trigger.json` or `./jenkins-trigger.toml`
//! 2. The same names in the parent and grandparent directory
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use jenkins_trigger_domain::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use jenkins_trigger_domain::{
    Config, EndpointConfig, JobConfig, JobParameters, PollingConfig, Result, TriggerError,
};

use crate::errors::InfraError;

const CONFIG_FILE_STEM: &str = "jenkins-trigger";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `TriggerError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or invalid
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `TriggerError::Config` if required variables are missing
/// or any variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("JENKINS_URL")?;
    let username = env_var("JENKINS_USERNAME")?;
    let password = env_var("JENKINS_PASSWORD")?;
    let job_url = env_var("JENKINS_JOB_URL")?;

    let parameters = env_opt("JENKINS_JOB_PARAMETERS")
        .map(|raw| raw.parse::<JobParameters>())
        .transpose()?
        .unwrap_or_default();

    let defaults = PollingConfig::default();
    let polling = PollingConfig {
        queue_interval_ms: env_parse("JENKINS_QUEUE_POLL_MS")?
            .unwrap_or(defaults.queue_interval_ms),
        build_interval_ms: env_parse("JENKINS_BUILD_POLL_MS")?
            .unwrap_or(defaults.build_interval_ms),
        log_interval_ms: env_parse("JENKINS_LOG_POLL_MS")?.unwrap_or(defaults.log_interval_ms),
        overall_timeout_secs: env_parse("JENKINS_TIMEOUT_SECS")?,
    };

    let config = Config {
        endpoint: EndpointConfig {
            base_url,
            username,
            password,
            client_cert: env_opt("JENKINS_CLIENT_CERT"),
            client_key: env_opt("JENKINS_CLIENT_KEY"),
            request_timeout_secs: env_parse("JENKINS_REQUEST_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        },
        job: JobConfig { job_url, parameters, stream_log: env_bool("JENKINS_STREAM_LOG", true) },
        polling,
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TriggerError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The parsed configuration does not validate
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TriggerError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TriggerError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TriggerError::from(InfraError::from(e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `TriggerError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| TriggerError::from(InfraError::from(e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TriggerError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(TriggerError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for `jenkins-trigger.{json,toml}` in the current working
/// directory, its parent and grandparent, then next to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    ["", "..", "../.."]
        .iter()
        .flat_map(|up| {
            let base = dir.join(up);
            ["json", "toml"].map(|ext| base.join(format!("{CONFIG_FILE_STEM}.{ext}")))
        })
        .collect()
}

/// Get required environment variable
///
/// # Errors
/// Returns `TriggerError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        TriggerError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Optional environment variable; empty counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional environment variable.
///
/// # Errors
/// Returns `TriggerError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| TriggerError::Config(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    env_opt(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
