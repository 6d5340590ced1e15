pub use self::asset::*;
pub use self::bundler_config::*;
pub use self::config_env::*;
pub use self::diagnostic::*;
pub use self::file_type::*;
pub use self::stats::*;

mod asset;
mod bundler_config;
mod config_env;
mod diagnostic;
mod file_type;
mod stats;
