pub use error::*;
pub use workerpack::*;
pub use workerpack_filesystem as file_system;

pub mod asset_extractor;
pub mod build_driver;
pub mod bundle;
pub mod command_line;
pub mod project_size;
pub mod wasm_loader;
pub mod workerpack;

mod error;
