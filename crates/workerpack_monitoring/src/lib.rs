//! Configures tracing for the workerpack binary.
//!
//! Monitoring should only be initialized once.
use std::io::Write;
use std::sync::Mutex;

pub use from_env::FromEnvError;
pub use tracer::TracerMode;

mod from_env;
mod tracer;

/// Target of the event `report_fatal_error` records, kept out of the stderr layer
pub const FATAL_ERROR_TARGET: &str = "workerpack::fatal";

static MONITORING_GUARD: Mutex<Option<MonitoringGuard>> = Mutex::new(None);

pub struct MonitoringGuard {
  #[allow(unused)]
  tracer: tracer::Tracer,
}

#[derive(Debug)]
pub struct MonitoringOptions {
  pub tracing_options: Vec<TracerMode>,
}

impl MonitoringOptions {
  pub fn from_env() -> Result<Self, FromEnvError> {
    Ok(Self {
      tracing_options: TracerMode::from_env()?,
    })
  }
}

pub fn initialize_monitoring(options: MonitoringOptions) -> anyhow::Result<()> {
  let mut global = MONITORING_GUARD
    .lock()
    .map_err(|_| anyhow::anyhow!("Monitoring state is poisoned"))?;

  if global.is_some() {
    tracing::warn!("Monitoring is getting set-up twice, this will no-op");
    return Ok(());
  }

  let tracer = tracer::Tracer::new(&options.tracing_options)?;
  *global = Some(MonitoringGuard { tracer });

  Ok(())
}

pub fn initialize_from_env() -> anyhow::Result<()> {
  initialize_monitoring(MonitoringOptions::from_env()?)
}

/// Flushes buffered log lines. Call before exiting the process.
pub fn close_monitoring() {
  if let Ok(mut global) = MONITORING_GUARD.lock() {
    global.take();
  }
}

/// Prints an error that ends the process, with its full cause chain.
///
/// Standard error is written directly, whatever tracing was configured with. The error is also
/// recorded as a tracing event for the file layer.
pub fn report_fatal_error(error: &anyhow::Error) {
  let _ = write_fatal_error(&mut std::io::stderr().lock(), error);
  tracing::error!(target: FATAL_ERROR_TARGET, "{error:#}");
}

fn write_fatal_error(out: &mut impl Write, error: &anyhow::Error) -> std::io::Result<()> {
  writeln!(out, "Error: {error:#}")?;
  out.flush()
}
