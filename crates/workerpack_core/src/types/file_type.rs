use std::path::Path;

/// Represents an output file type by its extension
///
/// Defaults to `FileType::Js` for convenience.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FileType {
  #[default]
  Js,
  Wasm,
  Other(String),
}

impl FileType {
  pub fn extension(&self) -> &str {
    match self {
      FileType::Js => "js",
      FileType::Wasm => "wasm",
      FileType::Other(s) => s.as_str(),
    }
  }

  /// Only the exact extension is matched, so `mjs` and `cjs` outputs are not scripts
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "js" => FileType::Js,
      "wasm" => FileType::Wasm,
      ext => FileType::Other(ext.to_string()),
    }
  }

  /// Classifies an asset by the text after the last `.` of its file name
  pub fn from_filename(name: &str) -> Self {
    let ext = Path::new(name)
      .extension()
      .and_then(|ext| ext.to_str())
      .unwrap_or_default();

    Self::from_extension(ext)
  }
}
