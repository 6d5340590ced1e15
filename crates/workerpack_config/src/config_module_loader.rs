use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use serde_json5::Location;
use workerpack_core::plugin::ConfigEvaluatorRef;

use crate::config_module::ConfigFuture;
use crate::ConfigEnv;
use crate::ConfigError;
use crate::ConfigModule;

/// Config modules the bundler's runtime evaluates
pub const SCRIPT_CONFIG_EXTENSIONS: [&str; 3] = ["js", "mjs", "cjs"];

pub type ConfigModuleLoaderRef = Arc<dyn ConfigModuleLoader>;

/// Turns the source text of a config module into a `ConfigModule`
///
/// Loaders are selected by file extension.
#[mockall::automock]
pub trait ConfigModuleLoader: Send + Sync {
  fn load(&self, path: &Path, contents: &str) -> Result<ConfigModule, ConfigError>;
}

/// Loads `.json` config modules
#[derive(Debug, Default)]
pub struct JsonConfigModuleLoader;

impl ConfigModuleLoader for JsonConfigModuleLoader {
  fn load(&self, path: &Path, contents: &str) -> Result<ConfigModule, ConfigError> {
    let value = serde_json::from_str::<Value>(contents).map_err(|error| ConfigError::Parse {
      path: path.to_path_buf(),
      line: error.line(),
      column: error.column(),
      message: error.to_string(),
    })?;

    Ok(ConfigModule::Object(value))
  }
}

/// Loads `.json5` config modules, which allow comments and trailing commas
#[derive(Debug, Default)]
pub struct Json5ConfigModuleLoader;

impl ConfigModuleLoader for Json5ConfigModuleLoader {
  fn load(&self, path: &Path, contents: &str) -> Result<ConfigModule, ConfigError> {
    let value = serde_json5::from_str::<Value>(contents).map_err(|error| match error {
      serde_json5::Error::Message { msg, location } => {
        let location = location.unwrap_or(Location { column: 1, line: 1 });
        ConfigError::Parse {
          path: path.to_path_buf(),
          line: location.line,
          column: location.column,
          message: msg,
        }
      }
    })?;

    Ok(ConfigModule::Object(value))
  }
}

/// Loads `.js`, `.mjs` and `.cjs` config modules by handing them to a `ConfigEvaluator`
///
/// Evaluation is deferred until the module is resolved with an env, so whatever the script
/// exports is called with the env of this invocation.
pub struct ScriptConfigModuleLoader {
  evaluator: ConfigEvaluatorRef,
}

impl ScriptConfigModuleLoader {
  pub fn new(evaluator: ConfigEvaluatorRef) -> Self {
    Self { evaluator }
  }
}

impl ConfigModuleLoader for ScriptConfigModuleLoader {
  fn load(&self, path: &Path, _contents: &str) -> Result<ConfigModule, ConfigError> {
    let evaluator = self.evaluator.clone();
    let path = path.to_path_buf();

    Ok(ConfigModule::AsyncFunction(Box::new(
      move |env: &ConfigEnv| -> ConfigFuture {
        let evaluator = evaluator.clone();
        let path = path.clone();
        let env = env.clone();

        Box::pin(async move {
          tracing::debug!(path = %path.display(), "Evaluating script config module");
          evaluator.evaluate_config(&path, &env).await
        })
      },
    )))
  }
}

/// Config module loaders keyed by file extension
#[derive(Clone)]
pub struct ConfigModuleLoaders {
  loaders: HashMap<String, ConfigModuleLoaderRef>,
}

impl ConfigModuleLoaders {
  /// The built-in loaders, with script modules evaluated by `evaluator`
  pub fn new(evaluator: ConfigEvaluatorRef) -> Self {
    let mut loaders = Self::empty();
    loaders.register("json", Arc::new(JsonConfigModuleLoader));
    loaders.register("json5", Arc::new(Json5ConfigModuleLoader));

    let script_loader: ConfigModuleLoaderRef = Arc::new(ScriptConfigModuleLoader::new(evaluator));
    for extension in SCRIPT_CONFIG_EXTENSIONS {
      loaders.register(extension, script_loader.clone());
    }

    loaders
  }

  pub fn empty() -> Self {
    Self {
      loaders: HashMap::new(),
    }
  }

  pub fn register(&mut self, extension: impl Into<String>, loader: ConfigModuleLoaderRef) {
    self.loaders.insert(extension.into(), loader);
  }

  pub fn for_path(&self, path: &Path) -> Option<&ConfigModuleLoaderRef> {
    path
      .extension()
      .and_then(|ext| ext.to_str())
      .and_then(|ext| self.loaders.get(ext))
  }
}
