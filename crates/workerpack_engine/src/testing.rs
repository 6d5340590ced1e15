use std::collections::HashMap;
use std::collections::VecDeque;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::mpsc;
use workerpack_core::plugin::*;
use workerpack_core::types::Assets;
use workerpack_core::types::BundlerConfig;
use workerpack_core::types::ConfigEnv;
use workerpack_core::types::Stats;
use xxhash_rust::xxh3::Xxh3;

const DEFAULT_TAP: &str = "FetchCompileWasmTemplatePlugin";

/// The outcome of one scripted compilation
#[derive(Clone, Debug)]
pub enum TestingBuild {
  Succeeded(Stats),
  Failed(String),
}

/// What the wasm loading hook produced when a build started
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedWasmLoading {
  pub tap: String,
  pub strategy: String,
  pub generated_code: String,
  pub supports_streaming: bool,
  pub mangle_imports: bool,
}

#[derive(Debug, Default)]
struct Recording {
  config_evaluations: Vec<(PathBuf, ConfigEnv)>,
  configs: Vec<BundlerConfig>,
  wasm_loading: Vec<RecordedWasmLoading>,
}

/// Read access to what a `TestingBundlerFactory` and its compilers were given
#[derive(Clone, Debug, Default)]
pub struct TestingRecorder(Arc<Mutex<Recording>>);

impl TestingRecorder {
  /// Config modules evaluated, with the env they were evaluated with
  pub fn config_evaluations(&self) -> Vec<(PathBuf, ConfigEnv)> {
    self.0.lock().config_evaluations.clone()
  }

  /// Configurations passed to `create_compiler`, in call order
  pub fn configs(&self) -> Vec<BundlerConfig> {
    self.0.lock().configs.clone()
  }

  /// Wasm loading code generated at the start of each `run` or `watch`
  pub fn wasm_loading(&self) -> Vec<RecordedWasmLoading> {
    self.0.lock().wasm_loading.clone()
  }
}

/// An engine that replays scripted compilations
///
/// Every compiler it creates shares the same script; a build that is consumed is gone.
pub struct TestingBundlerFactory {
  builds: Arc<Mutex<VecDeque<TestingBuild>>>,
  config_modules: HashMap<PathBuf, Value>,
  taps: Vec<String>,
  recorder: TestingRecorder,
}

impl TestingBundlerFactory {
  pub fn new(builds: impl IntoIterator<Item = TestingBuild>) -> Self {
    Self {
      builds: Arc::new(Mutex::new(builds.into_iter().collect())),
      config_modules: HashMap::new(),
      taps: vec![String::from(DEFAULT_TAP)],
      recorder: TestingRecorder::default(),
    }
  }

  /// Replaces the names the default wasm loading strategy is registered under
  pub fn with_taps(mut self, taps: &[&str]) -> Self {
    self.taps = taps.iter().map(|tap| tap.to_string()).collect();
    self
  }

  /// The value the script config module at `path` evaluates to
  pub fn with_config_module(mut self, path: impl Into<PathBuf>, value: Value) -> Self {
    self.config_modules.insert(path.into(), value);
    self
  }

  pub fn recorder(&self) -> TestingRecorder {
    self.recorder.clone()
  }
}

#[async_trait]
impl ConfigEvaluator for TestingBundlerFactory {
  async fn evaluate_config(&self, path: &Path, env: &ConfigEnv) -> anyhow::Result<Value> {
    self
      .recorder
      .0
      .lock()
      .config_evaluations
      .push((path.to_path_buf(), env.clone()));

    self
      .config_modules
      .get(path)
      .cloned()
      .ok_or_else(|| anyhow::anyhow!("Cannot find module '{}'", path.display()))
  }
}

#[async_trait]
impl BundlerFactory for TestingBundlerFactory {
  async fn create_compiler(&self, config: BundlerConfig) -> anyhow::Result<Box<dyn Compiler>> {
    self.recorder.0.lock().configs.push(config.clone());

    let mut hooks = CompilerHooks::default();
    for tap in &self.taps {
      hooks
        .wasm_loading
        .tap(tap.clone(), Box::new(FetchCompileWasm) as WasmLoadStrategyRef);
    }

    Ok(Box::new(TestingCompiler {
      options: config,
      hooks,
      builds: self.builds.clone(),
      recorder: self.recorder.clone(),
    }))
  }
}

#[derive(Debug)]
pub struct TestingCompiler {
  options: BundlerConfig,
  hooks: CompilerHooks,
  builds: Arc<Mutex<VecDeque<TestingBuild>>>,
  recorder: TestingRecorder,
}

impl TestingCompiler {
  fn record_wasm_loading(&self) {
    let mut recording = self.recorder.0.lock();
    for tap in self.hooks.wasm_loading.taps() {
      recording.wasm_loading.push(RecordedWasmLoading {
        tap: tap.name.clone(),
        strategy: tap.handler.name().to_string(),
        generated_code: tap.handler.generate_load_expression(),
        supports_streaming: tap.handler.supports_streaming(),
        mangle_imports: tap.handler.mangle_imports(),
      });
    }
  }

  fn next_build(&self) -> Option<anyhow::Result<Stats>> {
    let build = self.builds.lock().pop_front()?;

    Some(match build {
      TestingBuild::Succeeded(mut stats) => {
        if stats.hash.is_empty() {
          stats.hash = hash_assets(&stats.assets);
        }
        Ok(stats)
      }
      TestingBuild::Failed(message) => Err(anyhow::anyhow!(message)),
    })
  }
}

#[async_trait]
impl Compiler for TestingCompiler {
  fn options(&self) -> &BundlerConfig {
    &self.options
  }

  fn hooks(&self) -> &CompilerHooks {
    &self.hooks
  }

  fn hooks_mut(&mut self) -> &mut CompilerHooks {
    &mut self.hooks
  }

  async fn run(&mut self) -> anyhow::Result<Stats> {
    self.record_wasm_loading();

    self
      .next_build()
      .unwrap_or_else(|| Err(anyhow::anyhow!("No scripted builds remain")))
  }

  /// Replays every remaining build, then closes the stream
  async fn watch(&mut self) -> anyhow::Result<WatchReceiver> {
    self.record_wasm_loading();

    let remaining = self.builds.lock().len();
    let (tx, rx) = mpsc::channel(remaining.max(1));

    while let Some(result) = self.next_build() {
      let failed = result.is_err();
      tx.try_send(result)?;
      if failed {
        break;
      }
    }

    Ok(rx)
  }
}

/// Content hash of a compilation's assets, in emission order
pub fn hash_assets(assets: &Assets) -> String {
  let mut hasher = Xxh3::new();
  for asset in assets.iter() {
    hasher.update(asset.name.as_bytes());
    hasher.update(asset.code.bytes());
  }
  format!("{:016x}", hasher.digest())
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use serde_json::json;
  use workerpack_core::types::Asset;

  use super::*;

  fn stats(script: &str) -> Stats {
    Stats {
      assets: Assets::from_iter([Asset::new("worker.js", script)]),
      ..Stats::default()
    }
  }

  #[tokio::test]
  async fn replays_builds_in_order() {
    let factory = TestingBundlerFactory::new([
      TestingBuild::Succeeded(stats("one")),
      TestingBuild::Failed(String::from("boom")),
    ]);

    let mut compiler = factory
      .create_compiler(BundlerConfig::from_entry("./index.js"))
      .await
      .unwrap();

    assert!(compiler.run().await.is_ok());
    assert_eq!(
      compiler.run().await.map_err(|err| err.to_string()),
      Err(String::from("boom"))
    );
    assert!(compiler.run().await.is_err());
  }

  #[tokio::test]
  async fn hashes_assets_when_no_hash_is_scripted() {
    let factory = TestingBundlerFactory::new([
      TestingBuild::Succeeded(stats("same")),
      TestingBuild::Succeeded(stats("same")),
      TestingBuild::Succeeded(stats("different")),
      TestingBuild::Succeeded(Stats {
        hash: String::from("scripted"),
        ..stats("same")
      }),
    ]);

    let mut compiler = factory
      .create_compiler(BundlerConfig::default())
      .await
      .unwrap();

    let mut hashes = Vec::new();
    for _ in 0..4 {
      hashes.push(compiler.run().await.unwrap().hash);
    }

    assert_eq!(hashes[0], hashes[1]);
    assert_ne!(hashes[1], hashes[2]);
    assert_eq!(hashes[3], "scripted");
  }

  #[tokio::test]
  async fn watch_stops_after_a_hard_failure() {
    let factory = TestingBundlerFactory::new([
      TestingBuild::Succeeded(stats("one")),
      TestingBuild::Failed(String::from("engine crashed")),
      TestingBuild::Succeeded(stats("never")),
    ]);

    let mut compiler = factory
      .create_compiler(BundlerConfig::default())
      .await
      .unwrap();
    let mut results = compiler.watch().await.unwrap();

    assert!(results.recv().await.is_some_and(|result| result.is_ok()));
    assert!(results.recv().await.is_some_and(|result| result.is_err()));
    assert!(results.recv().await.is_none());
  }

  #[tokio::test]
  async fn evaluates_scripted_config_modules() {
    let factory = TestingBundlerFactory::new(Vec::new())
      .with_config_module("/project/webpack.config.js", json!({ "entry": "./index.js" }));
    let recorder = factory.recorder();

    let env = ConfigEnv {
      watch: true,
      ..ConfigEnv::default()
    };

    assert_eq!(
      factory
        .evaluate_config(Path::new("/project/webpack.config.js"), &env)
        .await
        .unwrap(),
      json!({ "entry": "./index.js" })
    );
    assert!(factory
      .evaluate_config(Path::new("/project/other.config.js"), &env)
      .await
      .is_err());
    assert_eq!(
      recorder.config_evaluations()[0],
      (PathBuf::from("/project/webpack.config.js"), env)
    );
  }

  #[tokio::test]
  async fn records_configs_and_generated_wasm_loading() {
    let factory = TestingBundlerFactory::new([TestingBuild::Succeeded(stats("one"))])
      .with_taps(&["FetchCompileWasmTemplatePlugin", "ReadFileCompileWasmTemplatePlugin"]);
    let recorder = factory.recorder();

    let mut compiler = factory
      .create_compiler(BundlerConfig::from_entry("./index.js"))
      .await
      .unwrap();
    compiler.run().await.unwrap();

    assert_eq!(recorder.configs(), vec![BundlerConfig::from_entry("./index.js")]);
    assert_eq!(
      recorder
        .wasm_loading()
        .into_iter()
        .map(|loading| loading.tap)
        .collect::<Vec<String>>(),
      vec![
        String::from("FetchCompileWasmTemplatePlugin"),
        String::from("ReadFileCompileWasmTemplatePlugin")
      ]
    );
    assert!(recorder.wasm_loading()[0].generated_code.starts_with("fetch("));
  }
}
