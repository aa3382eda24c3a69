//! Canned server states.

use jenkins_trigger_domain::{Build, BuildResult, ExecutableReference, LogChunk, QueuedItem};

pub const BASE_URL: &str = "https://ci.example.com";
pub const QUEUE_URL: &str = "https://ci.example.com/queue/item/42/";
pub const BUILD_URL: &str = "https://ci.example.com/job/x/2/";

pub fn waiting_item() -> QueuedItem {
    QueuedItem { blocked: true, why: Some("Waiting for next available executor".into()), ..Default::default() }
}

pub fn buildable_item() -> QueuedItem {
    QueuedItem { buildable: true, ..Default::default() }
}

pub fn assigned_item(url: &str) -> QueuedItem {
    QueuedItem {
        executable: Some(ExecutableReference { number: 2, url: url.to_string() }),
        ..Default::default()
    }
}

pub fn cancelled_item() -> QueuedItem {
    QueuedItem { cancelled: Some(true), ..Default::default() }
}

pub fn running_build() -> Build {
    Build { building: true, number: Some(2), ..Default::default() }
}

pub fn finished_build(result: BuildResult) -> Build {
    Build {
        building: false,
        result: Some(result),
        number: Some(2),
        url: Some(BUILD_URL.to_string()),
        duration_ms: Some(1_250),
        display_name: Some("x #2".into()),
    }
}

pub fn chunk(text: &str, next_offset: Option<u64>, more_data: bool) -> LogChunk {
    raw_chunk(text.as_bytes(), next_offset, more_data)
}

pub fn raw_chunk(data: &[u8], next_offset: Option<u64>, more_data: bool) -> LogChunk {
    LogChunk { data: data.to_vec(), next_offset, more_data }
}
