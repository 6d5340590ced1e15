//! Adapters connecting workerpack to a bundler engine.
//!
//! `process` drives an engine host running in a child process; `testing` is a scripted
//! in-memory engine used by tests.
pub mod process;
pub mod testing;

pub use process::EngineCommand;
pub use process::ProcessBundlerFactory;
pub use testing::TestingBuild;
pub use testing::TestingBundlerFactory;
