use std::sync::Arc;

use workerpack::command_line::ArgumentMap;
use workerpack::command_line::CliOptions;
use workerpack::file_system::os_file_system::OsFileSystem;
use workerpack::file_system::FileSystemRef;
use workerpack::Workerpack;
use workerpack::WorkerpackInitOptions;
use workerpack_engine::EngineCommand;
use workerpack_engine::ProcessBundlerFactory;

#[tokio::main(flavor = "current_thread")]
async fn main() {
  if let Err(error) = workerpack_monitoring::initialize_from_env() {
    eprintln!("Failed to initialize tracing: {error:#}");
  }

  if let Err(error) = run().await {
    workerpack_monitoring::report_fatal_error(&error);
    workerpack_monitoring::close_monitoring();
    std::process::exit(1);
  }

  workerpack_monitoring::close_monitoring();
}

async fn run() -> anyhow::Result<()> {
  let args = ArgumentMap::from_env()?;
  let options = CliOptions::try_from(&args)?;

  let fs: FileSystemRef = Arc::new(OsFileSystem);
  let cwd = fs.cwd()?;
  let command = EngineCommand::resolve(&options.engine, &cwd)?;
  let engine = Arc::new(ProcessBundlerFactory::new(command, cwd));

  let workerpack = Workerpack::new(WorkerpackInitOptions {
    args,
    options,
    engine: engine.clone(),
    config_evaluator: engine,
    fs,
  });

  workerpack.build().await
}
