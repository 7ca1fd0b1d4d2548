//! Single-file compression probes.
//!
//! A probe compresses one file into the shared temp archive, lists the
//! archive, and turns the reported sizes into a ratio. Probes share one
//! archive path and must never run concurrently.

pub mod listing;
pub mod process;
pub mod seven_zip;

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

pub use listing::parse_listing;
pub use process::{ProcessOutput, ProcessRunner, SystemRunner};
pub use seven_zip::SevenZip;

/// Sizes reported by the compressor's listing, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePair {
    pub original: u64,
    pub compressed: u64,
}

/// Adapter around an external archiver.
pub trait Compressor {
    /// Create `archive` holding exactly `input`.
    fn compress_one_file(&self, input: &Path, archive: &Path) -> Result<()>;
    /// Read back the original and compressed size of the archived file.
    fn list_archive(&self, archive: &Path) -> Result<SizePair>;
}

impl<C: Compressor + ?Sized> Compressor for Box<C> {
    fn compress_one_file(&self, input: &Path, archive: &Path) -> Result<()> {
        (**self).compress_one_file(input, archive)
    }

    fn list_archive(&self, archive: &Path) -> Result<SizePair> {
        (**self).list_archive(archive)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResult {
    pub original_size: u64,
    pub compressed_size: u64,
    pub ratio: f64,
}

impl From<SizePair> for ProbeResult {
    fn from(sizes: SizePair) -> Self {
        Self {
            original_size: sizes.original,
            compressed_size: sizes.compressed,
            ratio: compression_ratio(sizes.original, sizes.compressed),
        }
    }
}

/// `1 - compressed / original`, or 0 for an empty original.
///
/// Negative when compression grows the file.
pub fn compression_ratio(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        0.0
    } else {
        1.0 - compressed as f64 / original as f64
    }
}

pub struct CompressionProber<C: Compressor> {
    compressor: C,
    temp_archive: PathBuf,
}

impl<C: Compressor> CompressionProber<C> {
    pub fn new(compressor: C, temp_archive: impl Into<PathBuf>) -> Self {
        Self {
            compressor,
            temp_archive: temp_archive.into(),
        }
    }

    pub fn temp_archive(&self) -> &Path {
        &self.temp_archive
    }

    /// Compress `path` into the temp archive and measure it.
    ///
    /// The temp archive is removed before and after, whether or not the probe succeeds.
    pub fn probe(&mut self, path: &Path) -> Result<ProbeResult> {
        let archive = TempArtifact::claim(&self.temp_archive);
        self.compressor.compress_one_file(path, archive.path())?;
        let sizes = self.compressor.list_archive(archive.path())?;
        Ok(ProbeResult::from(sizes))
    }
}

/// Scoped ownership of the temp archive path; deletes it on creation and drop.
struct TempArtifact<'a> {
    path: &'a Path,
}

impl<'a> TempArtifact<'a> {
    fn claim(path: &'a Path) -> Self {
        remove_quietly(path);
        Self { path }
    }

    fn path(&self) -> &Path {
        self.path
    }
}

impl Drop for TempArtifact<'_> {
    fn drop(&mut self) {
        remove_quietly(self.path);
    }
}

fn remove_quietly(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        trace!("Could not remove {}: {}", path.display(), err);
    }
}
