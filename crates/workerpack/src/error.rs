use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WorkerpackError {
  #[error("malformed arguments: expected --key=value, got {token:?}")]
  MalformedArguments { token: String },

  #[error("Missing required argument --{name}=<value>")]
  MissingArgument { name: &'static str },

  #[error(
    "Unable to find the {tap} wasm loading hook on the compiler (registered: {}). \
     Make sure the bundler has WebAssembly support enabled.",
    list_or_none(.registered)
  )]
  HookNotFound { tap: String, registered: Vec<String> },

  #[error("A worker can embed a single WebAssembly module, the build emitted {}", .names.join(", "))]
  MultipleWasmAssets { names: Vec<String> },

  #[error("Output asset {name} is not valid UTF-8")]
  InvalidAssetEncoding { name: String },
}

fn list_or_none(values: &[String]) -> String {
  if values.is_empty() {
    String::from("none")
  } else {
    values.join(", ")
  }
}
