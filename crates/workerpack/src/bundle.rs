use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use workerpack_core::types::BundlerConfig;
use workerpack_core::types::Diagnostic;
use workerpack_core::types::Stats;
use workerpack_filesystem::FileSystemRef;

use crate::asset_extractor::ExtractedAssets;

/// The bundle description the calling tool reads back after every successful build.
///
/// `script`, `wasm` and `errors` are always present. The remaining fields are omitted when
/// unknown.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bundle {
  pub script: String,
  pub wasm: Option<String>,
  pub errors: Vec<Diagnostic>,
  /// The bundler's output directory, which the caller removes once it has read the bundle
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dist_to_clean: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub wasm_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub wasm_size: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub script_size: Option<usize>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub compiler_output: Option<String>,
}

impl Bundle {
  pub fn new(extracted: ExtractedAssets, stats: &Stats, options: &BundlerConfig) -> Self {
    let script_size = extracted.script.len();
    let (wasm, wasm_name, wasm_size) = match extracted.wasm {
      Some(module) => (
        Some(module.encoded),
        Some(module.name),
        Some(module.bytes.len()),
      ),
      None => (None, None, None),
    };

    Self {
      script: extracted.script,
      wasm,
      errors: stats.errors.clone(),
      dist_to_clean: options
        .output_path()
        .map(|path| path.to_string_lossy().into_owned()),
      wasm_name,
      wasm_size,
      script_size: Some(script_size),
      compiler_output: stats.log.clone(),
    }
  }
}

/// Writes bundles to the caller's output file
#[derive(Debug)]
pub struct BundleEmitter {
  fs: FileSystemRef,
  output_file: PathBuf,
}

impl BundleEmitter {
  pub fn new(fs: FileSystemRef, output_file: PathBuf) -> Self {
    Self { fs, output_file }
  }

  /// Replaces the output file with the serialized bundle
  pub fn emit(&self, bundle: &Bundle) -> anyhow::Result<()> {
    let contents = serde_json::to_vec(bundle)?;

    self
      .fs
      .write(&self.output_file, &contents)
      .with_context(|| format!("Failed to write bundle to {}", self.output_file.display()))?;

    tracing::debug!(output_file = %self.output_file.display(), bytes = contents.len(), "Wrote bundle");

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;
  use std::sync::Arc;

  use pretty_assertions::assert_eq;
  use serde_json::json;
  use serde_json::Value;
  use workerpack_filesystem::in_memory_file_system::InMemoryFileSystem;
  use workerpack_filesystem::FileSystem;
  use workerpack_filesystem::MockFileSystem;

  use super::*;
  use crate::asset_extractor::WasmModule;

  fn options(value: Value) -> BundlerConfig {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn serializes_required_fields_only_when_nothing_else_is_known() {
    let bundle = Bundle::new(
      ExtractedAssets {
        script: String::from("a"),
        wasm: None,
      },
      &Stats::default(),
      &BundlerConfig::default(),
    );

    assert_eq!(
      serde_json::to_value(&bundle).unwrap(),
      json!({ "script": "a", "wasm": null, "errors": [], "script_size": 1 })
    );
  }

  #[test]
  fn carries_diagnostics_and_legacy_fields() {
    let stats = Stats {
      errors: vec![
        Diagnostic::new(json!({ "message": "Module not found", "moduleName": "./a.js" })),
        Diagnostic::from("plain"),
      ],
      log: Some(String::from("compiled with 2 errors")),
      ..Stats::default()
    };

    let bundle = Bundle::new(
      ExtractedAssets {
        script: String::from("abc"),
        wasm: Some(WasmModule {
          name: String::from("m.wasm"),
          bytes: vec![0, 97, 115, 109, 1, 0, 0, 0],
          encoded: String::from("AGFzbQEAAAA="),
        }),
      },
      &stats,
      &options(json!({ "output": { "path": "/project/dist" } })),
    );

    assert_eq!(
      serde_json::to_value(&bundle).unwrap(),
      json!({
        "script": "abc",
        "wasm": "AGFzbQEAAAA=",
        "errors": [
          { "message": "Module not found", "moduleName": "./a.js" },
          "plain"
        ],
        "dist_to_clean": "/project/dist",
        "wasm_name": "m.wasm",
        "wasm_size": 8,
        "script_size": 3,
        "compiler_output": "compiled with 2 errors"
      })
    );
  }

  #[test]
  fn emit_writes_the_output_file() {
    let fs = Arc::new(InMemoryFileSystem::default());
    fs.create_directory(Path::new("/out")).unwrap();

    let emitter = BundleEmitter::new(fs.clone(), PathBuf::from("/out/bundle.json"));
    let bundle = Bundle::new(ExtractedAssets::default(), &Stats::default(), &BundlerConfig::default());

    emitter.emit(&bundle).unwrap();

    assert_eq!(
      fs.read_to_string(Path::new("/out/bundle.json")).unwrap(),
      r#"{"script":"","wasm":null,"errors":[],"script_size":0}"#
    );
  }

  #[test]
  fn emit_reports_write_failures() {
    let mut fs = MockFileSystem::new();
    fs.expect_write()
      .times(1)
      .returning(|_, _| Err(std::io::Error::other("disk full")));

    let emitter = BundleEmitter::new(Arc::new(fs), PathBuf::from("/out/bundle.json"));
    let bundle = Bundle::new(ExtractedAssets::default(), &Stats::default(), &BundlerConfig::default());

    assert_eq!(
      emitter.emit(&bundle).map_err(|err| format!("{err:#}")),
      Err(String::from("Failed to write bundle to /out/bundle.json: disk full"))
    );
  }
}
