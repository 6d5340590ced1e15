use std::fmt::{Debug, Formatter};
use std::str;

use indexmap::IndexMap;

use super::file_type::FileType;

/// The emitted contents of an output asset
#[derive(PartialEq, Eq, Default, Clone)]
pub struct Code {
  inner: Vec<u8>,
}

impl Code {
  pub fn new(bytes: Vec<u8>) -> Self {
    Self { inner: bytes }
  }

  pub fn bytes(&self) -> &[u8] {
    &self.inner
  }

  pub fn as_str(&self) -> Result<&str, str::Utf8Error> {
    str::from_utf8(&self.inner)
  }

  pub fn size(&self) -> usize {
    self.inner.len()
  }
}

impl Debug for Code {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "Code({} bytes)", self.inner.len())
  }
}

impl From<String> for Code {
  fn from(value: String) -> Self {
    Self {
      inner: value.into_bytes(),
    }
  }
}

impl From<&str> for Code {
  fn from(value: &str) -> Self {
    Self {
      inner: value.as_bytes().to_vec(),
    }
  }
}

impl From<Vec<u8>> for Code {
  fn from(value: Vec<u8>) -> Self {
    Self { inner: value }
  }
}

/// A named output unit of a compilation
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Asset {
  /// The output file name, relative to the bundler's output path
  pub name: String,
  pub code: Code,
}

impl Asset {
  pub fn new(name: impl Into<String>, code: impl Into<Code>) -> Self {
    Self {
      name: name.into(),
      code: code.into(),
    }
  }

  pub fn file_type(&self) -> FileType {
    FileType::from_filename(&self.name)
  }

  pub fn size(&self) -> usize {
    self.code.size()
  }
}

/// Output assets keyed by file name, in the order the bundler emitted them
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Assets(IndexMap<String, Asset>);

impl Assets {
  pub fn insert(&mut self, asset: Asset) {
    self.0.insert(asset.name.clone(), asset);
  }

  pub fn get(&self, name: &str) -> Option<&Asset> {
    self.0.get(name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Asset> {
    self.0.values()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(|name| name.as_str())
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl FromIterator<Asset> for Assets {
  fn from_iter<T: IntoIterator<Item = Asset>>(iter: T) -> Self {
    let mut assets = Assets::default();
    for asset in iter {
      assets.insert(asset);
    }
    assets
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn keeps_emission_order() {
    let assets = Assets::from_iter([
      Asset::new("z.js", "z"),
      Asset::new("a.js", "a"),
      Asset::new("m.wasm", vec![0, 97, 115, 109]),
    ]);

    assert_eq!(
      assets.names().collect::<Vec<&str>>(),
      vec!["z.js", "a.js", "m.wasm"]
    );
  }

  #[test]
  fn reinserting_a_name_replaces_the_asset_in_place() {
    let assets = Assets::from_iter([
      Asset::new("a.js", "first"),
      Asset::new("b.js", "b"),
      Asset::new("a.js", "second"),
    ]);

    assert_eq!(assets.len(), 2);
    assert_eq!(assets.names().collect::<Vec<&str>>(), vec!["a.js", "b.js"]);
    assert_eq!(assets.get("a.js").map(|a| a.code.as_str().ok()), Some(Some("second")));
  }

  #[test]
  fn reports_byte_size() {
    let asset = Asset::new("m.wasm", vec![0, 97, 115, 109, 1, 0, 0, 0]);
    assert_eq!(asset.size(), 8);
    assert_eq!(asset.file_type(), FileType::Wasm);
  }
}
