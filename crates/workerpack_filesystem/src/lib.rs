use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// In-memory file-system for testing
pub mod in_memory_file_system;

/// File-system implementation using std::fs
pub mod os_file_system;

/// FileSystem abstraction instance
///
/// This should be `OsFileSystem` for non-testing environments and `InMemoryFileSystem` for testing.
pub type FileSystemRef = Arc<dyn FileSystem + Send + Sync>;

/// Trait abstracting the file-system operations workerpack performs
#[mockall::automock]
pub trait FileSystem: std::fmt::Debug {
  fn cwd(&self) -> std::io::Result<PathBuf>;

  /// Create a directory and all of its missing parents
  fn create_directory(&self, path: &Path) -> std::io::Result<()>;

  fn read_to_string(&self, path: &Path) -> std::io::Result<String>;
  fn is_file(&self, path: &Path) -> bool;

  /// Replace the file at `path` with `contents`
  ///
  /// Readers observe either the previous contents or the new contents, never a partial write.
  fn write(&self, path: &Path, contents: &[u8]) -> std::io::Result<()>;
}
