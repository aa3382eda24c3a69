//! Error types used throughout the trigger client

use thiserror::Error;

/// Longest response body excerpt kept on a [`TriggerError::RemoteRejection`].
pub const MAX_BODY_EXCERPT_CHARS: usize = 512;

/// Main error type for the trigger client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriggerError {
    /// The server answered with a status code of 400 or above.
    #[error("Remote rejected request: {status} {status_text}")]
    RemoteRejection { status: u16, status_text: String, body: String },

    #[error("Malformed URL '{url}': {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("Build trigger response carried no Location header")]
    MissingLocation,

    /// Queue resolution finished without an executable reference.
    #[error("Lost track of build queued at {queue_url}: {reason}")]
    LostTrackOfBuild { queue_url: String, reason: String },

    #[error("Unknown build result: {0}")]
    UnknownResult(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write output: {0}")]
    Output(String),
}

impl TriggerError {
    /// Build a rejection, keeping at most [`MAX_BODY_EXCERPT_CHARS`] of the body.
    pub fn remote_rejection(status: u16, status_text: impl Into<String>, body: &str) -> Self {
        Self::RemoteRejection {
            status,
            status_text: status_text.into(),
            body: excerpt(body, MAX_BODY_EXCERPT_CHARS),
        }
    }

    pub fn malformed_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedUrl { url: url.into(), reason: reason.to_string() }
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RemoteRejection { .. } => "remote_rejection",
            Self::MalformedUrl { .. } => "malformed_url",
            Self::MissingLocation => "missing_location",
            Self::LostTrackOfBuild { .. } => "lost_track_of_build",
            Self::UnknownResult(_) => "unknown_result",
            Self::Decode(_) => "decode",
            Self::Transport(_) => "transport_failure",
            Self::Cancelled => "cancelled",
            Self::Config(_) => "config",
            Self::Output(_) => "output",
        }
    }

    /// True when this is a rejection carrying the given HTTP status.
    pub fn is_remote_rejection_status(&self, expected: u16) -> bool {
        matches!(self, Self::RemoteRejection { status, .. } if *status == expected)
    }
}

fn excerpt(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        return body.to_string();
    }

    let mut truncated = body.chars().take(max_chars.saturating_sub(3)).collect::<String>();
    truncated.push_str("...");
    truncated
}

/// Result type alias for trigger client operations
pub type Result<T> = std::result::Result<T, TriggerError>;
