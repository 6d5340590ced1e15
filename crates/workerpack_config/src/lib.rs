pub mod config_module;
pub mod config_module_loader;
pub mod config_resolver;
mod error;

pub use config_module::ConfigEnv;
pub use config_module::ConfigModule;
pub use config_module_loader::ConfigModuleLoader;
pub use config_module_loader::ConfigModuleLoaders;
pub use config_module_loader::ScriptConfigModuleLoader;
pub use config_resolver::ConfigResolver;
pub use config_resolver::ConfigSource;
pub use config_resolver::ConfigWarning;
pub use config_resolver::ResolvedConfig;
pub use error::ConfigError;
