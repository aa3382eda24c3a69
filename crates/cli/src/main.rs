//! Jenkins trigger CLI
//!
//! Entry point for the `jenkins-trigger` command-line tool: trigger a job,
//! follow it through the queue to a terminal result, optionally tail its
//! console log to stdout, and report the result as step outputs.
//!
//! Exit status is 0 when the build succeeded, 1 when it finished with any
//! other result and 2 when the build could not be followed to the end.

mod outputs;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use jenkins_trigger_core::{BuildOrchestrator, PollContext};
use jenkins_trigger_domain::{BuildOutcome, Config, JobParameters, TriggerError};
use jenkins_trigger_infra::{config, init_tracing, JenkinsClient, LogFormat};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const EXIT_BUILD_FAILED: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "jenkins-trigger")]
#[command(about = "Trigger a remote build and wait for its result", version)]
struct Cli {
    /// Path to a JSON or TOML config file (default: environment, then
    /// ./jenkins-trigger.{json,toml})
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Job URL, absolute or relative to the server URL
    #[arg(long)]
    job_url: Option<String>,

    /// Build parameters as a JSON object
    #[arg(long)]
    parameters: Option<JobParameters>,

    /// Do not tail the console log
    #[arg(long)]
    no_stream_log: bool,

    /// Give up after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Diagnostic log format (text or json)
    #[arg(long, env = "JENKINS_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(job_url) = &self.job_url {
            config.job.job_url.clone_from(job_url);
        }
        if let Some(parameters) = &self.parameters {
            config.job.parameters = parameters.clone();
        }
        if self.no_stream_log {
            config.job.stream_log = false;
        }
        if self.timeout_secs.is_some() {
            config.polling.overall_timeout_secs = self.timeout_secs;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Loaded before parsing so `.env` can supply JENKINS_LOG_FORMAT.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    if let Err(err) = init_tracing(cli.log_format) {
        eprintln!("failed to initialise logging: {err}");
    }
    log_dotenv(&dotenv);

    let result = run(&cli).await;
    match &result {
        Ok(outcome) if outcome.is_success() => {
            info!(build_url = %outcome.build_url, "Build succeeded");
        }
        Ok(outcome) => {
            error!(result = %outcome.result, build_url = %outcome.build_url, "Build did not succeed");
        }
        Err(err) => {
            let kind = err.downcast_ref::<TriggerError>().map_or("internal", TriggerError::label);
            error!(kind, error = %format!("{err:#}"), "Build trigger failed");
        }
    }

    ExitCode::from(exit_status(&result))
}

async fn run(cli: &Cli) -> anyhow::Result<BuildOutcome> {
    let mut config = match &cli.config {
        Some(path) => config::load_from_file(Some(path.clone())),
        None => config::load(),
    }
    .context("failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let client = JenkinsClient::from_config(&config.endpoint)?;
    let sanitizer = client.sanitizer().clone();

    let cancel = CancellationToken::new();
    let _stop_watchdog = cancel.clone().drop_guard();
    let watchdog = spawn_watchdog(cancel.clone(), config.polling.overall_timeout());

    let orchestrator = BuildOrchestrator::with_settings(
        Arc::new(client),
        sanitizer,
        &config.polling,
        PollContext::default().with_cancellation(cancel.clone()),
    );

    info!(job_url = %config.job.job_url, stream_log = config.job.stream_log, "Triggering build");

    let outcome = if config.job.stream_log {
        let mut stdout = tokio::io::stdout();
        let (outcome, summary) = orchestrator
            .submit_and_await_with_log(&config.job.job_url, &config.job.parameters, &mut stdout)
            .await?;
        info!(bytes = summary.bytes_written, "Console log streamed");
        outcome
    } else {
        orchestrator.submit_and_await(&config.job.job_url, &config.job.parameters).await?
    };

    stop_watchdog(&cancel, watchdog).await;

    let github_output = std::env::var_os(outputs::GITHUB_OUTPUT_ENV).map(PathBuf::from);
    outputs::emit(&outcome, &mut std::io::stdout().lock(), github_output.as_deref())?;

    Ok(outcome)
}

fn log_dotenv(result: &dotenvy::Result<PathBuf>) {
    match result {
        Ok(path) => info!(path = %path.display(), "Loaded .env file"),
        // No .env file is the normal case.
        Err(err) if err.not_found() => debug!("No .env file found"),
        Err(err) => warn!(error = %err, "Could not load .env file"),
    }
}

/// Cancel `token` on Ctrl-C or once `deadline` has elapsed. Returns when
/// the token is cancelled by anyone.
fn spawn_watchdog(token: CancellationToken, deadline: Option<Duration>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let expired = async {
            match deadline {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            () = token.cancelled() => {}
            () = expired => {
                warn!(timeout_secs = deadline.map(|d| d.as_secs()), "Overall timeout elapsed, cancelling");
                token.cancel();
            }
            Ok(()) = tokio::signal::ctrl_c() => {
                warn!("Interrupted, cancelling");
                token.cancel();
            }
        }
    })
}

/// Stop the watchdog and wait for it. A failed watchdog is reported but does
/// not change the outcome of a build that already finished.
async fn stop_watchdog(token: &CancellationToken, watchdog: JoinHandle<()>) {
    token.cancel();
    if let Err(err) = watchdog.await {
        warn!(error = %err, panicked = err.is_panic(), "Watchdog task did not shut down cleanly");
    }
}

fn exit_status(result: &anyhow::Result<BuildOutcome>) -> u8 {
    match result {
        Ok(outcome) if outcome.is_success() => 0,
        Ok(_) => EXIT_BUILD_FAILED,
        Err(_) => EXIT_ERROR,
    }
}
