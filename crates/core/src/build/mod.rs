//! Build completion tracking

pub mod awaiter;

use jenkins_trigger_domain::{Build, BuildResult};

pub use awaiter::BuildAwaiter;

/// What the latest build observation means for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Running,
    Finished(BuildResult),
}

/// A build is finished exactly when it is not building and has a result.
pub fn evaluate_build(build: &Build) -> BuildStatus {
    match build.terminal_result() {
        Some(result) => BuildStatus::Finished(result),
        None => BuildStatus::Running,
    }
}
