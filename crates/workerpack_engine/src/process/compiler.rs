use std::fmt::Debug;
use std::fmt::Formatter;

use async_trait::async_trait;
use tokio::process::Child;
use tokio::process::ChildStdin;
use tokio::process::ChildStdout;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use workerpack_core::plugin::*;
use workerpack_core::types::BundlerConfig;
use workerpack_core::types::Stats;

use super::connection::RequestWriter;
use super::connection::ResponseReader;
use super::protocol::Request;
use super::protocol::Response;
use super::protocol::WasmLoading;

/// A compiler living in an engine host process
///
/// Dropping the compiler kills the host.
pub struct ProcessCompiler {
  // Held for `kill_on_drop`
  _child: Child,
  writer: RequestWriter<ChildStdin>,
  reader: Option<ResponseReader<ChildStdout>>,
  options: BundlerConfig,
  hooks: CompilerHooks,
  watcher: Option<JoinHandle<()>>,
}

impl ProcessCompiler {
  pub(super) fn new(
    child: Child,
    writer: RequestWriter<ChildStdin>,
    reader: ResponseReader<ChildStdout>,
    options: BundlerConfig,
    hooks: CompilerHooks,
  ) -> Self {
    Self {
      _child: child,
      writer,
      reader: Some(reader),
      options,
      hooks,
      watcher: None,
    }
  }

  async fn start_build(&mut self, watch: bool) -> anyhow::Result<ResponseReader<ChildStdout>> {
    let reader = self
      .reader
      .take()
      .ok_or_else(|| anyhow::anyhow!("The engine host is already watching"))?;

    let wasm_loading = self
      .hooks
      .wasm_loading
      .taps()
      .map(WasmLoading::from)
      .collect();

    self
      .writer
      .send(&Request::Build {
        watch,
        wasm_loading,
      })
      .await?;

    Ok(reader)
  }
}

impl Debug for ProcessCompiler {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ProcessCompiler")
      .field("options", &self.options)
      .field("hooks", &self.hooks)
      .finish()
  }
}

impl Drop for ProcessCompiler {
  fn drop(&mut self) {
    if let Some(watcher) = self.watcher.take() {
      watcher.abort();
    }
  }
}

async fn next_compilation(reader: &mut ResponseReader<ChildStdout>) -> anyhow::Result<Stats> {
  match reader.expect("a compilation").await? {
    Response::Done(compilation) => Stats::try_from(compilation),
    Response::Failed { message } => Err(anyhow::anyhow!(message)),
    Response::Ready { .. } => anyhow::bail!("The engine host reported ready twice"),
    Response::Config { .. } => anyhow::bail!("The engine host sent a config while compiling"),
  }
}

#[async_trait]
impl Compiler for ProcessCompiler {
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
    let mut reader = self.start_build(false).await?;
    let result = next_compilation(&mut reader).await;
    self.reader = Some(reader);
    result
  }

  async fn watch(&mut self) -> anyhow::Result<WatchReceiver> {
    let mut reader = self.start_build(true).await?;
    let (tx, rx) = mpsc::channel(1);

    self.watcher = Some(tokio::spawn(async move {
      loop {
        let result = next_compilation(&mut reader).await;
        let failed = result.is_err();

        if tx.send(result).await.is_err() || failed {
          break;
        }
      }
    }));

    Ok(rx)
  }
}
