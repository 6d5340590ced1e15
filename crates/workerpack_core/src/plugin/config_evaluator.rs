use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::types::ConfigEnv;

pub type ConfigEvaluatorRef = Arc<dyn ConfigEvaluator>;

/// Evaluates script config modules, which only the bundler's own runtime can execute.
///
/// The module may export the configuration, a function of the env, or a function returning a
/// promise of it. Implementations resolve all three down to the configuration value.
#[mockall::automock]
#[async_trait]
pub trait ConfigEvaluator: Send + Sync {
  async fn evaluate_config(&self, path: &Path, env: &ConfigEnv) -> anyhow::Result<Value>;
}
