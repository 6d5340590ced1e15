use std::collections::BTreeMap;

use serde::Serialize;

/// What a config module function is called with
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ConfigEnv {
  /// The command-line arguments of this invocation
  pub args: BTreeMap<String, String>,
  pub watch: bool,
}
