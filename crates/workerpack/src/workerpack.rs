use workerpack_config::ConfigEnv;
use workerpack_config::ConfigResolver;
use workerpack_core::plugin::BundlerFactoryRef;
use workerpack_core::plugin::ConfigEvaluatorRef;
use workerpack_filesystem::FileSystemRef;

use crate::build_driver::BuildDriver;
use crate::bundle::BundleEmitter;
use crate::command_line::ArgumentMap;
use crate::command_line::CliOptions;
use crate::wasm_loader::intercept_wasm_loading;

pub struct WorkerpackInitOptions {
  pub args: ArgumentMap,
  pub options: CliOptions,
  pub engine: BundlerFactoryRef,
  /// Evaluates script config modules, usually the engine itself
  pub config_evaluator: ConfigEvaluatorRef,
  pub fs: FileSystemRef,
}

/// Builds a worker: resolves the configuration, prepares the compiler and drives the builds.
pub struct Workerpack {
  pub args: ArgumentMap,
  pub options: CliOptions,
  pub engine: BundlerFactoryRef,
  pub config_evaluator: ConfigEvaluatorRef,
  pub fs: FileSystemRef,
}

impl Workerpack {
  pub fn new(
    WorkerpackInitOptions {
      args,
      options,
      engine,
      config_evaluator,
      fs,
    }: WorkerpackInitOptions,
  ) -> Self {
    Self {
      args,
      options,
      engine,
      config_evaluator,
      fs,
    }
  }

  /// Builds once, or keeps building until the compiler stops watching
  pub async fn build(&self) -> anyhow::Result<()> {
    let env = ConfigEnv {
      args: self.args.to_map(),
      watch: self.options.watch,
    };

    let resolved = ConfigResolver::new(self.fs.clone(), self.config_evaluator.clone())
      .resolve(&self.options.config_source, &env)
      .await?;

    let mut compiler = self.engine.create_compiler(resolved.config).await?;
    intercept_wasm_loading(compiler.hooks_mut(), &self.options.wasm_binding)?;

    let emitter = BundleEmitter::new(self.fs.clone(), self.options.output_file.clone());
    let mut driver = BuildDriver::new(compiler, emitter);

    if self.options.watch {
      driver.watch().await
    } else {
      driver.run_once().await.map(|_| ())
    }
  }
}
