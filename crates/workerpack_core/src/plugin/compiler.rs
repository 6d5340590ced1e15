use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::CompilerHooks;
use crate::types::BundlerConfig;
use crate::types::Stats;

/// Results of successive compilations in watch mode, in the order they finished.
///
/// An `Err` is a hard failure; engines stop watching after sending one.
pub type WatchReceiver = mpsc::Receiver<anyhow::Result<Stats>>;

pub type BundlerFactoryRef = Arc<dyn BundlerFactory>;

/// A connection to an external bundler engine.
///
/// The factory turns a resolved configuration into a compiler instance. The compiler owns any
/// engine resources (child processes, file watchers) for as long as it lives.
#[async_trait]
pub trait BundlerFactory: Send + Sync {
  async fn create_compiler(&self, config: BundlerConfig) -> anyhow::Result<Box<dyn Compiler>>;
}

/// A bundler compiler instance built from one configuration
///
/// Compilations are serialized by the compiler; a caller never has two builds outstanding.
#[async_trait]
pub trait Compiler: Debug + Send {
  /// The full options the engine compiles with, after applying its defaults
  fn options(&self) -> &BundlerConfig;

  fn hooks(&self) -> &CompilerHooks;

  fn hooks_mut(&mut self) -> &mut CompilerHooks;

  /// Compiles once
  async fn run(&mut self) -> anyhow::Result<Stats>;

  /// Starts watching the module graph, yielding one result per rebuild
  async fn watch(&mut self) -> anyhow::Result<WatchReceiver>;
}
