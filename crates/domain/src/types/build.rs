//! Build types
//!
//! The server reports a build's result as free text; [`BuildResult`] is the
//! closed set of terminal outcomes this client understands. Decoding goes
//! through [`BuildPayload`] so an unrecognised result surfaces as
//! [`TriggerError::UnknownResult`] rather than a generic parse failure.

use serde::{Deserialize, Serialize};

use crate::errors::TriggerError;
use crate::impl_wire_enum_conversions;

/// Terminal outcome of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuildResult {
    Success,
    Failure,
    Unstable,
    Aborted,
    NotBuilt,
}

impl_wire_enum_conversions!(BuildResult {
    Success => "SUCCESS",
    Failure => "FAILURE",
    Unstable => "UNSTABLE",
    Aborted => "ABORTED",
    NotBuilt => "NOT_BUILT",
});

impl BuildResult {
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

/// Wire representation returned by `{buildUrl}/api/json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPayload {
    #[serde(default)]
    pub building: bool,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub full_display_name: Option<String>,
}

/// Decoded build state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Build {
    pub building: bool,
    pub result: Option<BuildResult>,
    pub number: Option<u64>,
    pub url: Option<String>,
    /// Duration in milliseconds, zero while the build is running.
    pub duration_ms: Option<u64>,
    pub display_name: Option<String>,
}

impl Build {
    /// The terminal result, available once the build has stopped.
    pub fn terminal_result(&self) -> Option<BuildResult> {
        if self.building {
            None
        } else {
            self.result
        }
    }
}

impl TryFrom<BuildPayload> for Build {
    type Error = TriggerError;

    fn try_from(payload: BuildPayload) -> Result<Self, Self::Error> {
        let result = payload
            .result
            .map(|text| text.parse::<BuildResult>().map_err(TriggerError::UnknownResult))
            .transpose()?;

        Ok(Self {
            building: payload.building,
            result,
            number: payload.number,
            url: payload.url,
            duration_ms: payload.duration,
            display_name: payload.full_display_name,
        })
    }
}

/// What the caller gets back once a build has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutcome {
    pub result: BuildResult,
    pub build_url: String,
    pub number: Option<u64>,
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<Build, TriggerError> {
        let payload: BuildPayload = serde_json::from_str(json).unwrap();
        Build::try_from(payload)
    }

    #[test]
    fn test_every_result_maps_through_the_table() {
        let expected = [
            ("SUCCESS", BuildResult::Success),
            ("FAILURE", BuildResult::Failure),
            ("UNSTABLE", BuildResult::Unstable),
            ("ABORTED", BuildResult::Aborted),
            ("NOT_BUILT", BuildResult::NotBuilt),
        ];
        for (text, result) in expected {
            assert_eq!(text.parse::<BuildResult>().unwrap(), result);
            assert_eq!(result.to_string(), text);
        }
        assert_eq!(BuildResult::ALL.len(), expected.len());
    }

    #[test]
    fn test_serializes_as_wire_text() {
        assert_eq!(serde_json::to_string(&BuildResult::NotBuilt).unwrap(), "\"NOT_BUILT\"");
        assert_eq!(serde_json::to_string(&BuildResult::Success).unwrap(), "\"SUCCESS\"");
    }

    #[test]
    fn test_running_build_has_no_terminal_result() {
        let build = decode(r#"{"building": true, "result": null, "number": 7}"#).unwrap();
        assert!(build.building);
        assert_eq!(build.result, None);
        assert_eq!(build.terminal_result(), None);
        assert_eq!(build.number, Some(7));
    }

    #[test]
    fn test_finished_build_decodes_result() {
        let build = decode(
            r#"{"_class": "hudson.model.FreeStyleBuild", "building": false, "result": "UNSTABLE",
                "duration": 1200, "fullDisplayName": "trigger-test #2"}"#,
        )
        .unwrap();
        assert_eq!(build.terminal_result(), Some(BuildResult::Unstable));
        assert_eq!(build.duration_ms, Some(1200));
        assert_eq!(build.display_name.as_deref(), Some("trigger-test #2"));
    }

    #[test]
    fn test_unknown_result_is_rejected() {
        let err = decode(r#"{"building": false, "result": "PASSED"}"#).unwrap_err();
        assert_eq!(err, TriggerError::UnknownResult("PASSED".into()));
    }

    #[test]
    fn test_lowercase_result_is_rejected() {
        let err = decode(r#"{"building": false, "result": "success"}"#).unwrap_err();
        assert!(matches!(err, TriggerError::UnknownResult(text) if text == "success"));
    }

    #[test]
    fn test_outcome_success() {
        let outcome = BuildOutcome {
            result: BuildResult::Success,
            build_url: "https://ci.example.com/job/x/2/".into(),
            number: Some(2),
        };
        assert!(outcome.is_success());
        assert!(!BuildOutcome { result: BuildResult::Aborted, ..outcome }.is_success());
    }
}
