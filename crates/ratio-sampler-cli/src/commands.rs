use clap::{Args, Parser, Subcommand};
use ratio_sampler_core::{AppConfig, FailurePolicy};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ratio-sampler")]
#[command(about = "Estimate per-extension compression ratios by sampling files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan directories and compress a random sample of each extension
    Run(RunArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Directories to scan; defaults to `root_paths` from the configuration
    pub roots: Vec<String>,
    /// Files to probe per extension
    #[arg(short = 'n', long)]
    pub sample_size: Option<usize>,
    /// Seed for reproducible samples
    #[arg(long)]
    pub seed: Option<u64>,
    /// Compressor executable (7-Zip compatible)
    #[arg(long)]
    pub tool: Option<String>,
    /// Path of the scratch archive written by each probe
    #[arg(long)]
    pub temp_archive: Option<PathBuf>,
    /// Glob of paths to leave out; may be repeated
    #[arg(long = "ignore")]
    pub ignore_patterns: Vec<String>,
    /// Skip files whose probe fails instead of aborting
    #[arg(long)]
    pub skip_failures: bool,
    /// Skip directories that cannot be read instead of aborting
    #[arg(long)]
    pub skip_unreadable: bool,
    /// Also write the sorted results as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl RunArgs {
    /// Overlay command-line values on the loaded configuration.
    pub fn apply(&self, config: &mut AppConfig) {
        if !self.roots.is_empty() {
            config.root_paths = self.roots.clone();
        }
        if let Some(sample_size) = self.sample_size {
            config.sample_size = sample_size;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(tool) = &self.tool {
            config.compressor.program = Some(tool.clone());
        }
        if let Some(temp_archive) = &self.temp_archive {
            config.temp_archive = Some(temp_archive.clone());
        }
        config
            .ignore_patterns
            .extend(self.ignore_patterns.iter().cloned());
        if self.skip_failures {
            config.failure_policy = FailurePolicy::Skip;
        }
        if self.skip_unreadable {
            config.skip_unreadable = true;
        }
    }
}
