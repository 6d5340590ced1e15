use std::path::PathBuf;

use workerpack_config::ConfigSource;

use super::ArgumentMap;
use crate::wasm_loader::DEFAULT_WASM_BINDING;
use crate::WorkerpackError;

pub const DEFAULT_ENGINE: &str = "workerpack-engine";

/// Typed view of the arguments
#[derive(Clone, Debug, PartialEq)]
pub struct CliOptions {
  /// Where the bundle description is written after every successful build
  pub output_file: PathBuf,
  pub config_source: ConfigSource,
  /// The global the runtime exposes the WebAssembly module bytes under
  pub wasm_binding: String,
  pub watch: bool,
  /// The engine host command
  pub engine: String,
}

impl TryFrom<&ArgumentMap> for CliOptions {
  type Error = WorkerpackError;

  fn try_from(args: &ArgumentMap) -> Result<Self, Self::Error> {
    let output_file = args
      .get("output-file")
      .filter(|path| !path.is_empty())
      .map(PathBuf::from)
      .ok_or(WorkerpackError::MissingArgument {
        name: "output-file",
      })?;

    let config_source = if args.is_enabled("no-webpack-config") {
      let entry = args
        .get("use-entry")
        .filter(|entry| !entry.is_empty())
        .ok_or(WorkerpackError::MissingArgument { name: "use-entry" })?;

      ConfigSource::Entry(entry.to_string())
    } else {
      match args.get("webpack-config") {
        Some(path) if !path.is_empty() => ConfigSource::File(PathBuf::from(path)),
        _ => ConfigSource::default(),
      }
    };

    Ok(Self {
      output_file,
      config_source,
      wasm_binding: args
        .get("wasm-binding")
        .filter(|binding| !binding.is_empty())
        .unwrap_or(DEFAULT_WASM_BINDING)
        .to_string(),
      watch: args.is_enabled("watch"),
      engine: args
        .get("engine")
        .filter(|engine| !engine.is_empty())
        .unwrap_or(DEFAULT_ENGINE)
        .to_string(),
    })
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn options(tokens: &[&str]) -> Result<CliOptions, WorkerpackError> {
    CliOptions::try_from(&ArgumentMap::parse(tokens)?)
  }

  #[test]
  fn applies_defaults() {
    assert_eq!(
      options(&["--output-file=/tmp/bundle.json"]),
      Ok(CliOptions {
        output_file: PathBuf::from("/tmp/bundle.json"),
        config_source: ConfigSource::File(PathBuf::from("webpack.config.js")),
        wasm_binding: String::from("WASM_MODULE"),
        watch: false,
        engine: String::from("workerpack-engine"),
      })
    );
  }

  #[test]
  fn reads_every_option() {
    assert_eq!(
      options(&[
        "--output-file=out.json",
        "--webpack-config=config/worker.json5",
        "--wasm-binding=wasmprogram",
        "--watch=1",
        "--engine=./engine.js",
      ]),
      Ok(CliOptions {
        output_file: PathBuf::from("out.json"),
        config_source: ConfigSource::File(PathBuf::from("config/worker.json5")),
        wasm_binding: String::from("wasmprogram"),
        watch: true,
        engine: String::from("./engine.js"),
      })
    );
  }

  #[test]
  fn bundles_an_entry_without_a_config_module() {
    let options = options(&[
      "--output-file=out.json",
      "--no-webpack-config=1",
      "--use-entry=./index.js",
      "--webpack-config=ignored.json",
    ])
    .unwrap();

    assert_eq!(
      options.config_source,
      ConfigSource::Entry(String::from("./index.js"))
    );
  }

  #[test]
  fn requires_an_entry_without_a_config_module() {
    assert_eq!(
      options(&["--output-file=out.json", "--no-webpack-config=1"]),
      Err(WorkerpackError::MissingArgument { name: "use-entry" })
    );
  }

  #[test]
  fn requires_an_output_file() {
    assert_eq!(
      options(&["--watch=1"]),
      Err(WorkerpackError::MissingArgument {
        name: "output-file"
      })
    );
  }
}
