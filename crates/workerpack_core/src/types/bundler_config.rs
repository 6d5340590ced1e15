use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// A bundler configuration object.
///
/// Only the handful of keys the orchestrator normalizes are typed; every other key is kept
/// verbatim, in the order the user wrote it, and handed to the engine as-is.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct BundlerConfig(Map<String, Value>);

impl BundlerConfig {
  pub fn new(fields: Map<String, Value>) -> Self {
    Self(fields)
  }

  /// A configuration whose only property is the entry module
  pub fn from_entry(entry: impl Into<String>) -> Self {
    let mut fields = Map::new();
    fields.insert(String::from("entry"), Value::String(entry.into()));
    Self(fields)
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  pub fn entry(&self) -> Option<&Value> {
    self.0.get("entry")
  }

  pub fn target(&self) -> Option<&Value> {
    self.0.get("target")
  }

  pub fn set_target(&mut self, target: &str) {
    self
      .0
      .insert(String::from("target"), Value::String(target.to_string()));
  }

  pub fn output_field(&self, field: &str) -> Option<&Value> {
    self.0.get("output").and_then(|output| output.get(field))
  }

  /// Sets `output.<field>`, creating the `output` object when it is missing or not an object
  pub fn set_output_field(&mut self, field: &str, value: Value) {
    let output = self
      .0
      .entry("output")
      .or_insert_with(|| Value::Object(Map::new()));

    if !output.is_object() {
      *output = Value::Object(Map::new());
    }

    if let Value::Object(output) = output {
      output.insert(field.to_string(), value);
    }
  }

  /// Resolved `output.path`, the directory the bundler writes assets into
  pub fn output_path(&self) -> Option<PathBuf> {
    self
      .output_field("path")
      .and_then(|path| path.as_str())
      .map(PathBuf::from)
  }

  pub fn fields(&self) -> &Map<String, Value> {
    &self.0
  }
}

impl From<BundlerConfig> for Value {
  fn from(config: BundlerConfig) -> Self {
    Value::Object(config.0)
  }
}
