//! Queued item types
//!
//! A queued item is the server-side record of a build request that has not
//! yet been bound to an executor. It is only ever observed by this client.

use serde::{Deserialize, Serialize};

/// Reference to a concrete build, assigned once the queued item leaves the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableReference {
    pub number: u64,
    pub url: String,
}

/// Representation returned by `{queuedItemUrl}/api/json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub buildable: bool,
    #[serde(default)]
    pub stuck: bool,
    #[serde(default)]
    pub cancelled: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    /// Human readable reason the item is still waiting.
    #[serde(default)]
    pub why: Option<String>,
    #[serde(default)]
    pub in_queue_since: Option<i64>,
    #[serde(default)]
    pub executable: Option<ExecutableReference>,
}

impl QueuedItem {
    /// The executable URL, when one has been assigned and is non-empty.
    pub fn executable_url(&self) -> Option<&str> {
        self.executable.as_ref().map(|exe| exe.url.as_str()).filter(|url| !url.is_empty())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.unwrap_or(false)
    }
}
