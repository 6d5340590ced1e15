//! Messages exchanged with an engine host, one JSON document per line.
use std::path::PathBuf;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use workerpack_core::plugin::Tap;
use workerpack_core::plugin::WasmLoadStrategyRef;
use workerpack_core::types::Asset;
use workerpack_core::types::Assets;
use workerpack_core::types::BundlerConfig;
use workerpack_core::types::ConfigEnv;
use workerpack_core::types::Diagnostic;
use workerpack_core::types::Stats;

/// Sent to the engine host
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Request {
  /// Evaluates a script config module, calling an exported function with `env` and awaiting an
  /// exported promise. The host answers with `Response::Config`.
  EvaluateConfig { path: PathBuf, env: ConfigEnv },
  /// Creates the compiler. The host answers with `Response::Ready`.
  Configure { config: BundlerConfig },
  /// Starts compiling. The host answers with one `Response::Done` per compilation.
  Build {
    watch: bool,
    #[serde(rename = "wasmLoading")]
    wasm_loading: Vec<WasmLoading>,
  },
}

/// The code a wasm loading tap must generate, computed on this side of the pipe
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WasmLoading {
  pub tap: String,
  pub generated_code: String,
  pub supports_streaming: bool,
  pub mangle_imports: bool,
}

impl From<&Tap<WasmLoadStrategyRef>> for WasmLoading {
  fn from(tap: &Tap<WasmLoadStrategyRef>) -> Self {
    Self {
      tap: tap.name.clone(),
      generated_code: tap.handler.generate_load_expression(),
      supports_streaming: tap.handler.supports_streaming(),
      mangle_imports: tap.handler.mangle_imports(),
    }
  }
}

/// Received from the engine host
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Response {
  Ready {
    /// Wasm loading taps the host registered on its compiler
    taps: Vec<String>,
    /// The compiler options after the engine applied its defaults
    options: BundlerConfig,
  },
  /// The value a config module resolved to
  Config {
    value: Value,
  },
  Done(Compilation),
  Failed {
    message: String,
  },
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct Compilation {
  pub hash: String,
  pub assets: Vec<EncodedAsset>,
  #[serde(default)]
  pub errors: Vec<Diagnostic>,
  #[serde(default)]
  pub log: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct EncodedAsset {
  pub name: String,
  /// Base64 of the emitted bytes
  pub source: String,
}

impl TryFrom<Compilation> for Stats {
  type Error = anyhow::Error;

  fn try_from(compilation: Compilation) -> Result<Self, Self::Error> {
    let assets = compilation
      .assets
      .into_iter()
      .map(|asset| -> anyhow::Result<Asset> {
        let bytes = BASE64_STANDARD
          .decode(asset.source.as_bytes())
          .map_err(|err| anyhow::anyhow!("Asset {} is not valid base64: {err}", asset.name))?;
        Ok(Asset::new(asset.name, bytes))
      })
      .collect::<anyhow::Result<Assets>>()?;

    Ok(Stats {
      hash: compilation.hash,
      assets,
      errors: compilation.errors,
      log: compilation.log,
    })
  }
}
