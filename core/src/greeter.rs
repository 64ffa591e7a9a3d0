use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::PayloadError;

/// Name used when the event carries no `name` key.
pub const DEFAULT_NAME: &str = "World";

/// The input mapping delivered by whatever dispatches the invocation.
///
/// Only the `name` key is ever read. Any other keys are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Event(Map<String, Value>);

impl Event {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// The name to greet, if the event has one.
    ///
    /// Strings are returned as-is. Any other JSON value is rendered in its
    /// JSON text form, so `42` greets "42" and `null` greets "null".
    pub fn name(&self) -> Option<Cow<'_, str>> {
        self.0.get("name").map(|value| match value {
            Value::String(name) => Cow::Borrowed(name.as_str()),
            other => Cow::Owned(other.to_string()),
        })
    }
}

impl From<Map<String, Value>> for Event {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Response {
    pub message: String,
}

/// Builds the greeting for a single event.
pub fn handle(event: &Event) -> Response {
    let name = event.name().unwrap_or(Cow::Borrowed(DEFAULT_NAME));

    Response {
        message: format!("Hello, {}!", name),
    }
}

/// Greets an arbitrary JSON value, rejecting anything that is not an object.
pub fn handle_value(value: &Value) -> Result<Response, PayloadError> {
    match value {
        Value::Object(fields) => Ok(handle(&Event::from(fields.clone()))),
        other => Err(PayloadError::NotAnObject {
            found: json_kind(other),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
