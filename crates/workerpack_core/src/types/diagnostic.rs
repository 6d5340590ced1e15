use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// A compiler diagnostic exactly as the bundler serialized it.
///
/// Bundlers report diagnostics either as plain strings or as objects with a `message` field.
/// The value is carried through to the bundle file untouched; classification belongs to the
/// calling tool.
#[derive(Debug, Deserialize, PartialEq, Serialize, Clone)]
#[serde(transparent)]
pub struct Diagnostic(Value);

impl Diagnostic {
  pub fn new(value: Value) -> Self {
    Self(value)
  }

  pub fn value(&self) -> &Value {
    &self.0
  }

  /// Best-effort human readable message, for logging only
  pub fn message(&self) -> String {
    match &self.0 {
      Value::String(message) => message.clone(),
      Value::Object(fields) => match fields.get("message") {
        Some(Value::String(message)) => message.clone(),
        _ => self.0.to_string(),
      },
      value => value.to_string(),
    }
  }
}

impl Display for Diagnostic {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.message())
  }
}

impl From<&str> for Diagnostic {
  fn from(value: &str) -> Self {
    Self(Value::String(value.to_string()))
  }
}
