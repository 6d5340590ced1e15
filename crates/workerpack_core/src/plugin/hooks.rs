use std::fmt::Debug;

use super::WasmLoadStrategy;

pub type WasmLoadStrategyRef = Box<dyn WasmLoadStrategy>;

/// A named registration on a compiler hook
#[derive(Debug)]
pub struct Tap<T> {
  pub name: String,
  pub handler: T,
}

/// An ordered list of taps
#[derive(Debug)]
pub struct Hook<T> {
  taps: Vec<Tap<T>>,
}

impl<T> Default for Hook<T> {
  fn default() -> Self {
    Self { taps: Vec::new() }
  }
}

impl<T> Hook<T> {
  pub fn tap(&mut self, name: impl Into<String>, handler: T) {
    self.taps.push(Tap {
      name: name.into(),
      handler,
    });
  }

  pub fn find(&self, name: &str) -> Option<&Tap<T>> {
    self.taps.iter().find(|tap| tap.name == name)
  }

  pub fn find_mut(&mut self, name: &str) -> Option<&mut Tap<T>> {
    self.taps.iter_mut().find(|tap| tap.name == name)
  }

  pub fn taps(&self) -> impl Iterator<Item = &Tap<T>> {
    self.taps.iter()
  }

  pub fn names(&self) -> Vec<&str> {
    self.taps.iter().map(|tap| tap.name.as_str()).collect()
  }
}

/// Extension points a compiler exposes before it runs
#[derive(Debug, Default)]
pub struct CompilerHooks {
  /// Strategies generating the wasm loading runtime, keyed by the plugin that registered them
  pub wasm_loading: Hook<WasmLoadStrategyRef>,
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::plugin::FetchCompileWasm;

  #[test]
  fn finds_taps_by_exact_name() {
    let mut hooks = CompilerHooks::default();
    hooks
      .wasm_loading
      .tap("FetchCompileWasmTemplatePlugin", Box::new(FetchCompileWasm));

    assert!(hooks.wasm_loading.find("FetchCompileWasmTemplatePlugin").is_some());
    assert!(hooks.wasm_loading.find("FetchCompileWasm").is_none());
  }

  #[test]
  fn keeps_registration_order() {
    let mut hook: Hook<u8> = Hook::default();
    hook.tap("b", 1);
    hook.tap("a", 2);

    assert_eq!(hook.names(), vec!["b", "a"]);
  }

  #[test]
  fn find_mut_replaces_the_handler() {
    let mut hook: Hook<u8> = Hook::default();
    hook.tap("a", 1);

    if let Some(tap) = hook.find_mut("a") {
      tap.handler = 2;
    }

    assert_eq!(hook.find("a").map(|tap| tap.handler), Some(2));
  }
}
