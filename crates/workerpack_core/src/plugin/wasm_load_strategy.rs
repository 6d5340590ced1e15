use std::fmt::Debug;

/// Generates the runtime code a bundle uses to obtain a WebAssembly module's bytes.
///
/// The generated source must evaluate to a promise of a response-like object exposing an
/// `arrayBuffer()` method, the shape the bundler's wasm runtime expects from `fetch`.
pub trait WasmLoadStrategy: Debug + Send + Sync {
  /// Name used in logs
  fn name(&self) -> &str;

  /// JavaScript source text of the load expression
  fn generate_load_expression(&self) -> String;

  /// Whether the runtime may use `WebAssembly.instantiateStreaming`
  fn supports_streaming(&self) -> bool;

  /// Whether the bundler may shorten wasm import names
  fn mangle_imports(&self) -> bool;
}

/// The bundler's default strategy: fetch the `.wasm` file over the network next to the bundle
#[derive(Debug, Default)]
pub struct FetchCompileWasm;

impl WasmLoadStrategy for FetchCompileWasm {
  fn name(&self) -> &str {
    "fetch"
  }

  fn generate_load_expression(&self) -> String {
    String::from("fetch(__webpack_require__.p + wasmModuleFileName)")
  }

  fn supports_streaming(&self) -> bool {
    true
  }

  fn mangle_imports(&self) -> bool {
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn can_be_dyn() {
    let _strategy: Box<dyn WasmLoadStrategy> = Box::new(FetchCompileWasm);
  }

  #[test]
  fn fetch_strategy_streams() {
    let strategy = FetchCompileWasm;
    assert!(strategy.supports_streaming());
    assert!(strategy.generate_load_expression().starts_with("fetch("));
  }
}
