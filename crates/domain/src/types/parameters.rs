//! Job parameters
//!
//! Parameters are opaque to the client: an ordered mapping from parameter
//! name to an arbitrary JSON value, posted verbatim with the build trigger.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::TriggerError;

/// Ordered parameter name to value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobParameters(Map<String, Value>);

impl JobParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a parameter, keeping first-insertion order.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// Builder-style [`JobParameters::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for JobParameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Parses JSON object text; blank text yields no parameters.
impl FromStr for JobParameters {
    type Err = TriggerError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(other) => Err(TriggerError::Config(format!(
                "job parameters must be a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(err) => Err(TriggerError::Config(format!("invalid job parameters JSON: {err}"))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
