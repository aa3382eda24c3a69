//! Domain types and models
//!
//! Everything the client observes on the remote server, plus the client-side
//! bookkeeping derived from it.

pub mod build;
pub mod log;
pub mod parameters;
pub mod queue;

pub use build::{Build, BuildOutcome, BuildPayload, BuildResult};
pub use log::{LogChunk, LogCursor};
pub use parameters::JobParameters;
pub use queue::{ExecutableReference, QueuedItem};
