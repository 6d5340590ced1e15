use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Unable to locate config module {}", path.display())]
  NotFound { path: PathBuf },

  #[error("Failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse {} at line {line} column {column}: {message}", path.display())]
  Parse {
    path: PathBuf,
    line: usize,
    column: usize,
    message: String,
  },

  #[error("No config module loader is registered for {}", path.display())]
  UnsupportedModuleFormat { path: PathBuf },

  #[error("Config module failed to evaluate: {0}")]
  Evaluation(anyhow::Error),

  #[error(
    "Multiple webpack configurations are not supported ({count} were found). \
     Configure a single target, or point `webpack_config` at a file that exports one configuration."
  )]
  MultipleConfigurations { count: usize },

  #[error("Config module resolved to {kind}, expected a configuration object")]
  InvalidConfig { kind: &'static str },

  #[error(
    "Building a worker with target {target} is not supported. \
     Remove `target` from your configuration or set it to \"webworker\"."
  )]
  IncompatibleTarget { target: String },
}
