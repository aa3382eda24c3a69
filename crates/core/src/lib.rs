//! # Jenkins Trigger Core
//!
//! Build-lifecycle tracking and log-streaming protocol logic.
//!
//! This crate contains:
//! - Port interfaces for the build server and the delay primitive
//! - URL sanitization against the configured endpoint
//! - Pure decision functions for queued items, builds and log windows
//! - The queue resolver, build awaiter and log streamer poll loops
//! - The orchestrator composing them
//!
//! ## Architecture Principles
//! - Only depends on `jenkins-trigger-domain`
//! - No HTTP code; all remote access goes through [`ports::JenkinsApi`]
//! - Delays and cancellation go through [`poll::PollContext`] so the state
//!   machines run without real timing in tests

pub mod build;
pub mod console;
pub mod orchestrator;
pub mod poll;
pub mod ports;
pub mod queue;
pub mod sanitizer;

// Re-export specific items to avoid ambiguity
pub use build::{evaluate_build, BuildAwaiter, BuildStatus};
pub use console::{should_wait_before_next, LogStreamer, LogSummary};
pub use orchestrator::BuildOrchestrator;
pub use poll::PollContext;
pub use ports::{JenkinsApi, Sleeper, TokioSleeper};
pub use queue::{evaluate_queued_item, QueueResolver, QueueStatus};
pub use sanitizer::{append_path, UrlSanitizer};
