//! Runs the bundler in an engine host child process.
//!
//! The host owns the actual bundler and its runtime. This side asks it to evaluate script config
//! modules, sends it the resolved configuration and the wasm loading code each tap must generate,
//! and receives compilations back as JSON lines.
use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Child;
use tokio::process::ChildStdin;
use tokio::process::ChildStdout;
use tokio::process::Command;
use workerpack_core::plugin::*;
use workerpack_core::types::BundlerConfig;
use workerpack_core::types::ConfigEnv;

pub use self::compiler::ProcessCompiler;
use self::connection::RequestWriter;
use self::connection::ResponseReader;
use self::protocol::Request;
use self::protocol::Response;

mod compiler;
mod connection;
pub mod protocol;

const SCRIPT_EXTENSIONS: [&str; 3] = ["js", "mjs", "cjs"];

/// The program and arguments that start an engine host
#[derive(Clone, Debug, PartialEq)]
pub struct EngineCommand {
  pub program: PathBuf,
  pub args: Vec<OsString>,
}

impl EngineCommand {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
    self.args.push(arg.into());
    self
  }

  /// Resolves an `engine` argument into a command.
  ///
  /// Script paths run with `node`. Anything else is an executable, looked up on `PATH` unless
  /// it is a path.
  pub fn resolve(engine: &str, cwd: &Path) -> anyhow::Result<Self> {
    let engine_path = Path::new(engine);

    if is_script(engine_path) {
      let node = which::which("node").context("Running a script engine host requires node")?;
      return Ok(Self::new(node).arg(cwd.join(engine_path)));
    }

    let program = which::which_in(engine, std::env::var_os("PATH"), cwd)
      .with_context(|| format!("Unable to find the engine host {engine}"))?;

    Ok(Self::new(program))
  }
}

fn is_script(path: &Path) -> bool {
  path
    .extension()
    .and_then(|ext| ext.to_str())
    .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext))
}

struct EngineHost {
  child: Child,
  writer: RequestWriter<ChildStdin>,
  reader: ResponseReader<ChildStdout>,
}

/// Spawns one engine host per compiler, and one per config module evaluation
#[derive(Debug)]
pub struct ProcessBundlerFactory {
  command: EngineCommand,
  cwd: PathBuf,
}

impl ProcessBundlerFactory {
  pub fn new(command: EngineCommand, cwd: PathBuf) -> Self {
    Self { command, cwd }
  }

  fn spawn_host(&self) -> anyhow::Result<EngineHost> {
    tracing::debug!(program = %self.command.program.display(), "Starting engine host");

    let mut child = Command::new(&self.command.program)
      .args(&self.command.args)
      .current_dir(&self.cwd)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::inherit())
      .kill_on_drop(true)
      .spawn()
      .with_context(|| {
        format!(
          "Failed to start the engine host {}",
          self.command.program.display()
        )
      })?;

    let stdin = child
      .stdin
      .take()
      .context("Engine host stdin is not piped")?;
    let stdout = child
      .stdout
      .take()
      .context("Engine host stdout is not piped")?;

    Ok(EngineHost {
      child,
      writer: RequestWriter::new(stdin),
      reader: ResponseReader::new(stdout),
    })
  }
}

#[async_trait]
impl ConfigEvaluator for ProcessBundlerFactory {
  async fn evaluate_config(&self, path: &Path, env: &ConfigEnv) -> anyhow::Result<Value> {
    let EngineHost {
      child: _child,
      mut writer,
      mut reader,
    } = self.spawn_host()?;

    writer
      .send(&Request::EvaluateConfig {
        path: path.to_path_buf(),
        env: env.clone(),
      })
      .await?;

    match reader.expect("the evaluated config module").await? {
      Response::Config { value } => Ok(value),
      Response::Failed { message } => Err(anyhow::anyhow!(message)),
      Response::Ready { .. } | Response::Done(_) => {
        anyhow::bail!("The engine host answered a config evaluation with a compiler message")
      }
    }
  }
}

#[async_trait]
impl BundlerFactory for ProcessBundlerFactory {
  async fn create_compiler(&self, config: BundlerConfig) -> anyhow::Result<Box<dyn Compiler>> {
    let EngineHost {
      child,
      mut writer,
      mut reader,
    } = self.spawn_host()?;

    writer.send(&Request::Configure { config }).await?;

    let (taps, options) = match reader.expect("the compiler to be ready").await? {
      Response::Ready { taps, options } => (taps, options),
      Response::Failed { message } => {
        anyhow::bail!("The engine host failed to create a compiler: {message}")
      }
      Response::Done(_) => anyhow::bail!("The engine host compiled before it was asked to"),
      Response::Config { .. } => anyhow::bail!("The engine host sent a config before it was asked to"),
    };

    let mut hooks = CompilerHooks::default();
    for tap in taps {
      hooks
        .wasm_loading
        .tap(tap, Box::new(FetchCompileWasm) as WasmLoadStrategyRef);
    }

    Ok(Box::new(ProcessCompiler::new(
      child, writer, reader, options, hooks,
    )))
  }
}
