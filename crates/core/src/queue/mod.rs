//! Queued item resolution
//!
//! Turns the queued-item URL returned by a build trigger into the URL of the
//! build the server eventually assigns to it.

pub mod resolver;

use jenkins_trigger_domain::QueuedItem;

pub use resolver::QueueResolver;

/// What the latest queued-item observation means for the poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueStatus {
    /// Not yet bound to an executor; poll again.
    Waiting,
    /// An executable was assigned at this (unsanitized) URL.
    Resolved(String),
    /// The server cancelled the item; no build will ever be assigned.
    Cancelled,
}

/// Classify a queued item. First match wins:
///
/// 1. `buildable` means still waiting, even when an executable is present.
/// 2. A non-empty executable URL means resolved.
/// 3. A cancelled item ends the wait without a build.
/// 4. Anything else (`blocked`, `stuck`, unclassified) is still waiting.
pub fn evaluate_queued_item(item: &QueuedItem) -> QueueStatus {
    if item.buildable {
        return QueueStatus::Waiting;
    }
    if let Some(url) = item.executable_url() {
        return QueueStatus::Resolved(url.to_string());
    }
    if item.is_cancelled() {
        return QueueStatus::Cancelled;
    }
    QueueStatus::Waiting
}
