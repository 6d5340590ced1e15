use std::fmt::Display;
use std::fmt::Formatter;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::asset_extractor::ExtractedAssets;

/// Compressed size limit of a worker upload
pub const WORKER_SIZE_LIMIT: u64 = 1024 * 1024;

/// Remaining headroom below which a build is reported as close to the limit
pub const SIZE_WARNING_HEADROOM: u64 = 80 * 1024;

/// Approximate upload size of a worker, after compression
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProjectSize {
  pub compressed: u64,
}

impl ProjectSize {
  pub fn measure(extracted: &ExtractedAssets) -> anyhow::Result<Self> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(extracted.script.as_bytes())?;
    if let Some(wasm) = &extracted.wasm {
      encoder.write_all(&wasm.bytes)?;
    }

    let compressed = encoder.finish()?.len() as u64;

    Ok(Self { compressed })
  }

  pub fn exceeds_limit(&self) -> bool {
    self.compressed > WORKER_SIZE_LIMIT
  }

  pub fn near_limit(&self) -> bool {
    !self.exceeds_limit() && WORKER_SIZE_LIMIT - self.compressed < SIZE_WARNING_HEADROOM
  }

  /// Logs the size, warning when the worker is close to or above the limit
  pub fn report(&self) {
    if self.exceeds_limit() {
      tracing::warn!(
        "Your worker is {} after compression, which is above the 1 MiB limit. It will be rejected on upload.",
        self
      );
    } else if self.near_limit() {
      tracing::warn!(
        "Your worker is {} after compression, within {} of the 1 MiB limit.",
        self,
        HumanSize(SIZE_WARNING_HEADROOM)
      );
    } else {
      tracing::info!("Worker size: {} after compression", self);
    }
  }
}

impl Display for ProjectSize {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    HumanSize(self.compressed).fmt(f)
  }
}

struct HumanSize(u64);

impl Display for HumanSize {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let bytes = self.0;
    if bytes < 1024 {
      write!(f, "{bytes} B")
    } else if bytes < 1024 * 1024 {
      write!(f, "{:.1} KiB", bytes as f64 / 1024.0)
    } else {
      write!(f, "{:.2} MiB", bytes as f64 / (1024.0 * 1024.0))
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use tracing_test::traced_test;

  use super::*;
  use crate::asset_extractor::WasmModule;

  #[test]
  fn compresses_repetitive_scripts() {
    let extracted = ExtractedAssets {
      script: "addEventListener('fetch', handle);\n".repeat(1000),
      wasm: None,
    };

    let size = ProjectSize::measure(&extracted).unwrap();

    assert!(size.compressed > 0);
    assert!(size.compressed < extracted.script.len() as u64 / 10);
  }

  #[test]
  fn includes_the_wasm_module() {
    let script_only = ExtractedAssets {
      script: String::from("export default {}"),
      wasm: None,
    };
    let with_wasm = ExtractedAssets {
      wasm: Some(WasmModule {
        name: String::from("m.wasm"),
        bytes: (0..=255).collect(),
        encoded: String::new(),
      }),
      ..script_only.clone()
    };

    assert!(
      ProjectSize::measure(&with_wasm).unwrap().compressed
        > ProjectSize::measure(&script_only).unwrap().compressed
    );
  }

  #[test]
  fn classifies_against_the_limit() {
    let small = ProjectSize { compressed: 10 * 1024 };
    let near = ProjectSize {
      compressed: WORKER_SIZE_LIMIT - 10 * 1024,
    };
    let over = ProjectSize {
      compressed: WORKER_SIZE_LIMIT + 1,
    };

    assert!(!small.near_limit() && !small.exceeds_limit());
    assert!(near.near_limit() && !near.exceeds_limit());
    assert!(!over.near_limit() && over.exceeds_limit());
  }

  #[test]
  fn formats_human_readable_sizes() {
    assert_eq!(ProjectSize { compressed: 512 }.to_string(), "512 B");
    assert_eq!(ProjectSize { compressed: 1536 }.to_string(), "1.5 KiB");
    assert_eq!(
      ProjectSize {
        compressed: 3 * 1024 * 1024
      }
      .to_string(),
      "3.00 MiB"
    );
  }

  #[traced_test]
  #[test]
  fn warns_near_the_limit() {
    ProjectSize {
      compressed: WORKER_SIZE_LIMIT - 1024,
    }
    .report();

    assert!(logs_contain("within 80.0 KiB of the 1 MiB limit"));
  }
}
