use std::collections::HashMap;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::FileSystem;

#[cfg(not(target_os = "windows"))]
fn root_dir() -> PathBuf {
  PathBuf::from("/")
}

#[cfg(target_os = "windows")]
fn root_dir() -> PathBuf {
  PathBuf::from("C:/")
}

/// In memory implementation of a file-system entry
#[derive(Debug)]
enum InMemoryFileSystemEntry {
  File { contents: Vec<u8> },
  Directory,
}

/// In memory implementation of the `FileSystem` trait, for testing purposes.
#[derive(Debug)]
pub struct InMemoryFileSystem {
  files: RwLock<HashMap<PathBuf, InMemoryFileSystemEntry>>,
  current_working_directory: RwLock<PathBuf>,
}

impl Default for InMemoryFileSystem {
  fn default() -> Self {
    Self {
      files: Default::default(),
      current_working_directory: RwLock::new(root_dir()),
    }
  }
}

impl InMemoryFileSystem {
  /// Change the current working directory. Used for resolving relative paths.
  pub fn set_current_working_directory(&self, cwd: &Path) {
    let cwd = self.canonicalize(cwd);
    let mut state = self.current_working_directory.write();
    *state = cwd;
  }

  pub fn write_file(&self, path: &Path, contents: String) {
    let path = self.canonicalize(path);
    let mut files = self.files.write();

    files.insert(
      path.clone(),
      InMemoryFileSystemEntry::File {
        contents: contents.into_bytes(),
      },
    );

    let mut dir = path.parent();
    while let Some(path) = dir {
      files.insert(path.to_path_buf(), InMemoryFileSystemEntry::Directory);
      dir = path.parent();
    }
  }

  fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
    let path = self.canonicalize(path);
    let files = self.files.read();

    match files.get(&path) {
      None => Err(io::Error::new(io::ErrorKind::NotFound, "File not found")),
      Some(InMemoryFileSystemEntry::File { contents }) => Ok(contents.clone()),
      Some(InMemoryFileSystemEntry::Directory) => Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        "Path is a directory",
      )),
    }
  }

  fn canonicalize(&self, path: &Path) -> PathBuf {
    let cwd = self.current_working_directory.read();
    let mut result = if path.is_absolute() {
      vec![]
    } else {
      cwd.components().collect()
    };

    for component in path.components() {
      match component {
        Component::Prefix(prefix) => {
          result = vec![Component::Prefix(prefix)];
        }
        Component::RootDir => {
          result.push(Component::RootDir);
        }
        Component::CurDir => {}
        Component::ParentDir => {
          result.pop();
        }
        Component::Normal(path) => {
          result.push(Component::Normal(path));
        }
      }
    }

    PathBuf::from_iter(result)
  }
}

impl FileSystem for InMemoryFileSystem {
  fn cwd(&self) -> io::Result<PathBuf> {
    Ok(self.current_working_directory.read().clone())
  }

  fn create_directory(&self, path: &Path) -> io::Result<()> {
    let path = self.canonicalize(path);
    let mut files = self.files.write();

    let mut dir = Some(path.as_path());
    while let Some(path) = dir {
      files.insert(path.to_path_buf(), InMemoryFileSystemEntry::Directory);
      dir = path.parent();
    }

    Ok(())
  }

  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    let bytes = self.read_bytes(path)?;
    String::from_utf8(bytes).map_err(|_| io::Error::other("Unable to read file as string"))
  }

  fn is_file(&self, path: &Path) -> bool {
    let path = self.canonicalize(path);
    let files = self.files.read();

    matches!(files.get(&path), Some(InMemoryFileSystemEntry::File { .. }))
  }

  fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
    let path = self.canonicalize(path);
    let mut files = self.files.write();

    let parent_exists = match path.parent() {
      None => true,
      Some(parent) if parent == root_dir() => true,
      Some(parent) => matches!(files.get(parent), Some(InMemoryFileSystemEntry::Directory)),
    };

    if !parent_exists {
      return Err(io::Error::new(
        io::ErrorKind::NotFound,
        "Parent directory not found",
      ));
    }

    files.insert(
      path,
      InMemoryFileSystemEntry::File {
        contents: contents.to_vec(),
      },
    );

    Ok(())
  }
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn test_remove_relative_parent_dots() {
    let fs = InMemoryFileSystem::default();
    let result = fs.canonicalize(&root_dir().join("foo/./bar/../baz/"));
    assert_eq!(result, root_dir().join("foo/baz"));
  }

  #[test]
  fn test_with_cwd() {
    let fs = InMemoryFileSystem::default();
    fs.set_current_working_directory(Path::new("/other"));
    let result = fs.canonicalize(Path::new("./foo/./bar/../baz/"));
    assert_eq!(result, root_dir().join("other/foo/baz"));
    assert!(result.is_absolute());
  }

  #[test]
  fn test_read_file() {
    let fs = InMemoryFileSystem::default();
    fs.write_file(Path::new("/foo/bar"), String::from("contents"));
    let result = fs.read_to_string(Path::new("/foo/bar")).unwrap();
    assert_eq!(result, "contents");
    assert!(fs.is_file(Path::new("/foo/bar")));
    assert!(fs.write(Path::new("/foo/sibling"), b"").is_ok());
  }

  #[test]
  fn test_read_file_not_found() {
    let fs = InMemoryFileSystem::default();
    let result = fs.read_to_string(Path::new("/foo/bar"));
    assert_eq!(result.map_err(|err| err.kind()), Err(io::ErrorKind::NotFound));
  }

  #[test]
  fn test_relative_reads_use_cwd() {
    let fs = InMemoryFileSystem::default();
    fs.set_current_working_directory(Path::new("/project"));
    fs.write_file(Path::new("webpack.config.json"), String::from("{}"));

    assert!(fs.is_file(Path::new("/project/webpack.config.json")));
  }

  #[test]
  fn test_write_requires_parent_directory() {
    let fs = InMemoryFileSystem::default();
    let result = fs.write(Path::new("/missing/bundle.json"), b"{}");
    assert!(result.is_err());

    fs.create_directory(Path::new("/missing")).unwrap();
    fs.write(Path::new("/missing/bundle.json"), b"{}").unwrap();
    assert_eq!(fs.read_to_string(Path::new("/missing/bundle.json")).unwrap(), "{}");
  }
}
