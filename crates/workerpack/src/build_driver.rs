use workerpack_core::plugin::Compiler;
use workerpack_core::types::Stats;

use crate::asset_extractor::extract_assets;
use crate::bundle::Bundle;
use crate::bundle::BundleEmitter;
use crate::project_size::ProjectSize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildState {
  Idle,
  Compiling,
  Succeeded,
  Failed,
}

/// What happened to a finished compilation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildOutcome {
  /// The bundle was written
  Emitted { hash: String },
  /// Same hash as the previous build, nothing was written
  Unchanged { hash: String },
}

/// Runs a compiler and emits a bundle for each compilation it produces.
pub struct BuildDriver {
  compiler: Box<dyn Compiler>,
  emitter: BundleEmitter,
  state: BuildState,
  last_hash: Option<String>,
}

impl BuildDriver {
  pub fn new(compiler: Box<dyn Compiler>, emitter: BundleEmitter) -> Self {
    Self {
      compiler,
      emitter,
      state: BuildState::Idle,
      last_hash: None,
    }
  }

  pub fn state(&self) -> BuildState {
    self.state
  }

  /// Compiles once and always emits
  pub async fn run_once(&mut self) -> anyhow::Result<BuildOutcome> {
    self.state = BuildState::Compiling;
    tracing::info!("Compiling worker");

    let result = self.compiler.run().await;
    self.complete(result, false)
  }

  /// Emits every changed compilation until the compiler stops watching.
  ///
  /// A hard failure ends the watch with that error.
  pub async fn watch(&mut self) -> anyhow::Result<()> {
    self.state = BuildState::Compiling;
    tracing::info!("Watching for changes");

    let mut results = self.compiler.watch().await.inspect_err(|_| {
      self.state = BuildState::Failed;
    })?;

    while let Some(result) = results.recv().await {
      self.complete(result, true)?;
      self.state = BuildState::Compiling;
    }

    tracing::info!("The compiler stopped watching");
    self.state = BuildState::Idle;

    Ok(())
  }

  fn complete(
    &mut self,
    result: anyhow::Result<Stats>,
    skip_unchanged: bool,
  ) -> anyhow::Result<BuildOutcome> {
    let outcome = result.and_then(|stats| self.emit(stats, skip_unchanged));

    self.state = match outcome {
      Ok(_) => BuildState::Succeeded,
      Err(_) => BuildState::Failed,
    };

    outcome
  }

  fn emit(&mut self, stats: Stats, skip_unchanged: bool) -> anyhow::Result<BuildOutcome> {
    if skip_unchanged && self.last_hash.as_deref() == Some(stats.hash.as_str()) {
      tracing::debug!(hash = %stats.hash, "Compilation is unchanged, skipping emit");
      return Ok(BuildOutcome::Unchanged { hash: stats.hash });
    }

    for error in &stats.errors {
      tracing::warn!("{error}");
    }

    let extracted = extract_assets(&stats.assets)?;
    let size = ProjectSize::measure(&extracted)?;
    let bundle = Bundle::new(extracted, &stats, self.compiler.options());

    self.emitter.emit(&bundle)?;
    size.report();

    if stats.has_errors() {
      tracing::warn!("Built with {} error(s)", stats.errors.len());
    } else {
      tracing::info!("Built successfully");
    }

    self.last_hash = Some(stats.hash.clone());

    Ok(BuildOutcome::Emitted { hash: stats.hash })
  }
}
