use std::path::Path;
use std::path::PathBuf;

use serde_json::Value;
use workerpack_core::plugin::ConfigEvaluatorRef;
use workerpack_core::types::BundlerConfig;
use workerpack_filesystem::FileSystemRef;

use crate::ConfigEnv;
use crate::ConfigError;
use crate::ConfigModule;
use crate::ConfigModuleLoaders;

pub const WORKER_TARGET: &str = "webworker";
pub const WORKER_FILENAME: &str = "worker.js";
pub const WORKER_SOURCE_MAP_FILENAME: &str = "worker.map.js";
pub const DEFAULT_CONFIG_FILE: &str = "webpack.config.js";

/// Where the bundler configuration comes from
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigSource {
  /// No config module, bundle this entry with the bundler's defaults
  Entry(String),
  /// A config module, relative paths resolve against the working directory
  File(PathBuf),
}

impl Default for ConfigSource {
  fn default() -> Self {
    ConfigSource::File(PathBuf::from(DEFAULT_CONFIG_FILE))
  }
}

/// A user-configured value that was replaced during normalization
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigWarning {
  pub field: String,
  pub configured: Value,
  pub forced: Value,
}

impl std::fmt::Display for ConfigWarning {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{} is set to {} in your configuration. Workers require {}, so it will be overridden.",
      self.field, self.configured, self.forced
    )
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
  pub config: BundlerConfig,
  pub warnings: Vec<ConfigWarning>,
}

/// Loads the bundler configuration and normalizes it into the single worker target shape
pub struct ConfigResolver {
  fs: FileSystemRef,
  loaders: ConfigModuleLoaders,
}

impl ConfigResolver {
  /// Resolves with the built-in loaders, evaluating script config modules with `evaluator`
  pub fn new(fs: FileSystemRef, evaluator: ConfigEvaluatorRef) -> Self {
    Self::with_loaders(fs, ConfigModuleLoaders::new(evaluator))
  }

  pub fn with_loaders(fs: FileSystemRef, loaders: ConfigModuleLoaders) -> Self {
    Self { fs, loaders }
  }

  pub async fn resolve(
    &self,
    source: &ConfigSource,
    env: &ConfigEnv,
  ) -> Result<ResolvedConfig, ConfigError> {
    let value = match source {
      ConfigSource::Entry(entry) => Value::from(BundlerConfig::from_entry(entry.clone())),
      ConfigSource::File(path) => self.load_module(path)?.resolve(env).await?,
    };

    normalize(value)
  }

  fn load_module(&self, path: &Path) -> Result<ConfigModule, ConfigError> {
    let path = if path.is_absolute() {
      path.to_path_buf()
    } else {
      let cwd = self.fs.cwd().map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
      })?;
      cwd.join(path)
    };

    if !self.fs.is_file(&path) {
      return Err(ConfigError::NotFound { path });
    }

    let loader = self
      .loaders
      .for_path(&path)
      .ok_or_else(|| ConfigError::UnsupportedModuleFormat { path: path.clone() })?;

    let contents = self
      .fs
      .read_to_string(&path)
      .map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
      })?;

    tracing::debug!(path = %path.display(), "Loading config module");

    loader.load(&path, &contents)
  }
}

/// Rejects anything but a single configuration object, then forces the worker target and output
/// file names.
pub fn normalize(value: Value) -> Result<ResolvedConfig, ConfigError> {
  let fields = match value {
    Value::Object(fields) => fields,
    Value::Array(configs) => {
      return Err(ConfigError::MultipleConfigurations {
        count: configs.len(),
      });
    }
    other => {
      return Err(ConfigError::InvalidConfig {
        kind: value_kind(&other),
      });
    }
  };

  let mut config = BundlerConfig::new(fields);

  let force_target = match config.target() {
    None | Some(Value::Null) => true,
    Some(Value::String(target)) if target.is_empty() => true,
    Some(Value::String(target)) if target == WORKER_TARGET => false,
    Some(Value::String(target)) => {
      return Err(ConfigError::IncompatibleTarget {
        target: target.clone(),
      });
    }
    Some(other) => {
      return Err(ConfigError::IncompatibleTarget {
        target: other.to_string(),
      });
    }
  };

  if force_target {
    config.set_target(WORKER_TARGET);
  }

  let mut warnings = Vec::new();
  for (field, forced) in [
    ("filename", WORKER_FILENAME),
    ("sourceMapFilename", WORKER_SOURCE_MAP_FILENAME),
  ] {
    let forced = Value::String(forced.to_string());

    if let Some(configured) = config.output_field(field) {
      if *configured != forced {
        let warning = ConfigWarning {
          field: format!("output.{field}"),
          configured: configured.clone(),
          forced: forced.clone(),
        };

        tracing::warn!("{warning}");
        warnings.push(warning);
      }
    }

    config.set_output_field(field, forced);
  }

  Ok(ResolvedConfig { config, warnings })
}

fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
