//! Configures `tracing_subscriber` to write to standard error, a rolling log file, or both.
//!
//! Standard error is used when no mode is configured, it is where the calling tool expects
//! diagnostics to appear.
use std::collections::HashSet;

use anyhow::anyhow;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::from_env::optional_var;
use crate::from_env::FromEnvError;
use crate::FATAL_ERROR_TARGET;

pub const TRACING_MODE_VAR: &str = "WORKERPACK_TRACING_MODE";

const DEFAULT_FILTER: &str = "info";

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum TracerMode {
  /// Output the Tracer logs to stderr
  Stderr,
  /// Output the Tracer logs to an hourly rotated file in the temporary directory
  File,
}

impl TracerMode {
  pub fn from_env() -> Result<Vec<Self>, FromEnvError> {
    let Some(mode) = optional_var(TRACING_MODE_VAR) else {
      return Ok(vec![Self::Stderr]);
    };

    Self::parse_list(&mode)
  }

  /// Parses a comma separated list of modes, ignoring duplicates
  pub fn parse_list(value: &str) -> Result<Vec<Self>, FromEnvError> {
    let mut tracer_modes = vec![];
    let mut used_modes = HashSet::new();

    for mode in value.split(',').map(|s| s.trim()) {
      let mode = match mode {
        "stderr" => Self::Stderr,
        "file" => Self::File,
        value => {
          return Err(FromEnvError::InvalidKey(
            String::from(TRACING_MODE_VAR),
            anyhow!("Invalid value: {}", value),
          ))
        }
      };

      if used_modes.insert(mode.clone()) {
        tracer_modes.push(mode);
      }
    }

    Ok(tracer_modes)
  }
}

/// `RUST_LOG` when it is set and valid, `info` otherwise
fn env_filter() -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub struct Tracer {
  #[allow(unused)]
  worker_guards: Vec<WorkerGuard>,
}

impl Tracer {
  pub fn new(options: &[TracerMode]) -> anyhow::Result<Self> {
    let mut worker_guards = vec![];

    let file_layer = if options.contains(&TracerMode::File) {
      let directory = std::env::temp_dir().join("workerpack_trace");
      let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::HOURLY)
        .max_log_files(4)
        .filename_prefix("workerpack-tracing")
        .build(&directory)
        .map_err(|err| anyhow!(err))?;
      let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender);

      worker_guards.push(worker_guard);

      Some(
        tracing_subscriber::fmt::layer()
          .with_ansi(false)
          .with_writer(non_blocking)
          .with_filter(env_filter()),
      )
    } else {
      None
    };

    // Fatal errors are printed by `report_fatal_error`
    let stderr_layer = if options.contains(&TracerMode::Stderr) {
      let filter = env_filter().add_directive(format!("{FATAL_ERROR_TARGET}=off").parse()?);

      Some(
        tracing_subscriber::fmt::layer()
          .with_writer(std::io::stderr)
          .with_target(false)
          .with_filter(filter),
      )
    } else {
      None
    };

    let subscriber = Registry::default().with(file_layer).with(stderr_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(Self { worker_guards })
  }
}
