use workerpack_core::plugin::CompilerHooks;
use workerpack_core::plugin::WasmLoadStrategy;

use crate::WorkerpackError;

/// The tap the bundler registers its network based wasm loading under
pub const FETCH_COMPILE_WASM_TAP: &str = "FetchCompileWasmTemplatePlugin";

pub const DEFAULT_WASM_BINDING: &str = "WASM_MODULE";

/// Loads the wasm module from a binding the runtime injects, instead of fetching it.
///
/// Workers cannot fetch or compile modules at runtime. The generated code mimics a `fetch`
/// response whose `arrayBuffer()` resolves to the injected module.
#[derive(Clone, Debug, PartialEq)]
pub struct InjectedWasmBinding {
  binding: String,
}

impl InjectedWasmBinding {
  pub fn new(binding: impl Into<String>) -> Self {
    Self {
      binding: binding.into(),
    }
  }
}

impl WasmLoadStrategy for InjectedWasmBinding {
  fn name(&self) -> &str {
    "injected-binding"
  }

  fn generate_load_expression(&self) -> String {
    format!(
      "Promise.resolve({{\n  arrayBuffer() {{ return Promise.resolve({}); }}\n}})",
      self.binding
    )
  }

  fn supports_streaming(&self) -> bool {
    false
  }

  fn mangle_imports(&self) -> bool {
    false
  }
}

/// Replaces the handler of the fetch-compile tap with an `InjectedWasmBinding`.
///
/// Only the handler changes, the tap keeps its name and position.
pub fn intercept_wasm_loading(
  hooks: &mut CompilerHooks,
  binding: &str,
) -> Result<(), WorkerpackError> {
  let registered = hooks
    .wasm_loading
    .names()
    .into_iter()
    .map(String::from)
    .collect::<Vec<String>>();

  let Some(tap) = hooks.wasm_loading.find_mut(FETCH_COMPILE_WASM_TAP) else {
    return Err(WorkerpackError::HookNotFound {
      tap: String::from(FETCH_COMPILE_WASM_TAP),
      registered,
    });
  };

  tracing::debug!(
    tap = FETCH_COMPILE_WASM_TAP,
    replaced = tap.handler.name(),
    binding,
    "Intercepting wasm loading"
  );

  tap.handler = Box::new(InjectedWasmBinding::new(binding));

  Ok(())
}
