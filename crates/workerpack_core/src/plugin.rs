pub use compiler::*;
pub use config_evaluator::*;
pub use hooks::*;
pub use wasm_load_strategy::*;

mod compiler;
mod config_evaluator;
mod hooks;
mod wasm_load_strategy;
