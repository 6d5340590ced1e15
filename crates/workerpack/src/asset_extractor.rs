use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use workerpack_core::types::Assets;
use workerpack_core::types::FileType;

use crate::WorkerpackError;

/// The WebAssembly module of a build
#[derive(Clone, Debug, PartialEq)]
pub struct WasmModule {
  pub name: String,
  pub bytes: Vec<u8>,
  /// Standard, padded base64 of `bytes`
  pub encoded: String,
}

/// What a worker is made of, pulled out of the build's assets
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractedAssets {
  /// Every JavaScript asset, concatenated in emission order
  pub script: String,
  pub wasm: Option<WasmModule>,
}

/// Assets are classified by their last extension: `.js` assets (source maps named `*.map.js`
/// included) form the script, a `.wasm` asset is the module, anything else is ignored.
pub fn extract_assets(assets: &Assets) -> Result<ExtractedAssets, WorkerpackError> {
  let mut script = String::new();
  let mut wasm_assets = Vec::new();

  for asset in assets.iter() {
    match asset.file_type() {
      FileType::Js => {
        let source = asset
          .code
          .as_str()
          .map_err(|_| WorkerpackError::InvalidAssetEncoding {
            name: asset.name.clone(),
          })?;
        script.push_str(source);
      }
      FileType::Wasm => wasm_assets.push(asset),
      _ => {}
    }
  }

  let wasm = match wasm_assets.as_slice() {
    [] => None,
    [asset] => Some(WasmModule {
      name: asset.name.clone(),
      bytes: asset.code.bytes().to_vec(),
      encoded: BASE64_STANDARD.encode(asset.code.bytes()),
    }),
    _ => {
      return Err(WorkerpackError::MultipleWasmAssets {
        names: wasm_assets.iter().map(|asset| asset.name.clone()).collect(),
      })
    }
  };

  Ok(ExtractedAssets { script, wasm })
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use workerpack_core::types::Asset;

  use super::*;

  const WASM_BYTES: [u8; 8] = [0, 97, 115, 109, 1, 0, 0, 0];

  #[test]
  fn concatenates_scripts_and_encodes_the_module() {
    let assets = Assets::from_iter([
      Asset::new("b.js", "const b = 2;"),
      Asset::new("m.wasm", WASM_BYTES.to_vec()),
      Asset::new("a.js", "const a = 1;"),
    ]);

    let extracted = extract_assets(&assets).unwrap();

    assert_eq!(extracted.script, "const b = 2;const a = 1;");
    assert_eq!(
      extracted.wasm,
      Some(WasmModule {
        name: String::from("m.wasm"),
        bytes: WASM_BYTES.to_vec(),
        encoded: String::from("AGFzbQEAAAA="),
      })
    );
  }

  #[test]
  fn has_no_module_without_a_wasm_asset() {
    let assets = Assets::from_iter([Asset::new("worker.js", "addEventListener('fetch', () => {})")]);

    let extracted = extract_assets(&assets).unwrap();

    assert_eq!(extracted.wasm, None);
  }

  #[test]
  fn ignores_other_assets() {
    let assets = Assets::from_iter([
      Asset::new("worker.js", "a"),
      Asset::new("manifest.json", "{}"),
      Asset::new("style.css", "body {}"),
      Asset::new("worker.map.js", "b"),
    ]);

    assert_eq!(extract_assets(&assets).unwrap().script, "ab");
  }

  #[test]
  fn rejects_multiple_modules() {
    let assets = Assets::from_iter([
      Asset::new("a.wasm", WASM_BYTES.to_vec()),
      Asset::new("b.wasm", WASM_BYTES.to_vec()),
    ]);

    assert_eq!(
      extract_assets(&assets),
      Err(WorkerpackError::MultipleWasmAssets {
        names: vec![String::from("a.wasm"), String::from("b.wasm")]
      })
    );
  }

  #[test]
  fn rejects_scripts_that_are_not_utf8() {
    let assets = Assets::from_iter([Asset::new("worker.js", vec![0xff, 0xfe])]);

    assert_eq!(
      extract_assets(&assets),
      Err(WorkerpackError::InvalidAssetEncoding {
        name: String::from("worker.js")
      })
    );
  }
}
