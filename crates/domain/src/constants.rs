//! Protocol constants
//!
//! Centralized location for the paths, headers and default timings used when
//! talking to the build server.

// Poll intervals
pub const DEFAULT_QUEUE_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_BUILD_POLL_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_LOG_POLL_INTERVAL_MS: u64 = 1000;

// Transport
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("jenkins-trigger/", env!("CARGO_PKG_VERSION"));

// Remote paths, relative to a job, queued item or build URL
pub const BUILD_TRIGGER_PATH: &str = "build";
pub const API_JSON_PATH: &str = "api/json";
pub const PROGRESSIVE_TEXT_PATH: &str = "logText/progressiveText";
pub const PROGRESSIVE_TEXT_START_PARAM: &str = "start";

// Response headers of the progressive text endpoint
pub const TEXT_SIZE_HEADER: &str = "x-text-size";
pub const MORE_DATA_HEADER: &str = "x-more-data";
