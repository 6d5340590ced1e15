use super::asset::Assets;
use super::diagnostic::Diagnostic;

/// The result of a single compilation pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
  /// Opaque fingerprint of the compilation, only used to detect unchanged rebuilds
  pub hash: String,
  pub assets: Assets,
  /// Diagnostics reported without aborting the compilation
  pub errors: Vec<Diagnostic>,
  /// Log text the engine captured while compiling, if any
  pub log: Option<String>,
}

impl Stats {
  pub fn has_errors(&self) -> bool {
    !self.errors.is_empty()
  }
}
