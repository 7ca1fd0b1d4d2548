//! Per-extension compression-ratio sampling.
//!
//! Scan a tree, group files by extension, compress a random sample of each
//! group with an external archiver and report min/max/average ratios.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod probe;
pub mod progress;
pub mod report;
pub mod sampler;
pub mod scanner;

pub use aggregate::{GroupAggregator, GroupResult};
pub use config::{AppConfig, FailurePolicy};
pub use engine::{RunSummary, SamplingEngine};
pub use error::{Error, ParseError, Result};
pub use probe::{CompressionProber, Compressor, ProbeResult, SevenZip, SizePair};
pub use progress::{ProgressReporter, SilentReporter};
pub use sampler::Sampler;
pub use scanner::{DirectoryScanner, ExtensionGroup, ExtensionGroups};
