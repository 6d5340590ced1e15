use std::fmt::Debug;
use std::fmt::Formatter;
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
pub use workerpack_core::types::ConfigEnv;

use crate::ConfigError;

pub type ConfigFuture = Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send>>;

pub type ConfigFunction = Box<dyn Fn(&ConfigEnv) -> anyhow::Result<Value> + Send + Sync>;

pub type AsyncConfigFunction = Box<dyn Fn(&ConfigEnv) -> ConfigFuture + Send + Sync>;

/// The value a config module evaluates to.
///
/// Bundler config modules may export the configuration itself, a function producing it, or a
/// function producing it asynchronously.
pub enum ConfigModule {
  Object(Value),
  Function(ConfigFunction),
  AsyncFunction(AsyncConfigFunction),
}

impl ConfigModule {
  /// Evaluates the module down to a plain value, whichever shape it has
  pub async fn resolve(self, env: &ConfigEnv) -> Result<Value, ConfigError> {
    match self {
      ConfigModule::Object(value) => Ok(value),
      ConfigModule::Function(function) => function(env).map_err(ConfigError::Evaluation),
      ConfigModule::AsyncFunction(function) => function(env).await.map_err(ConfigError::Evaluation),
    }
  }
}

impl Debug for ConfigModule {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      ConfigModule::Object(value) => f.debug_tuple("Object").field(value).finish(),
      ConfigModule::Function(_) => f.write_str("Function"),
      ConfigModule::AsyncFunction(_) => f.write_str("AsyncFunction"),
    }
  }
}
