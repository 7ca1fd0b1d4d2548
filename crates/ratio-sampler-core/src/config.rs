use crate::error::{Error, Result};
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_SAMPLE_SIZE: usize = 10;
pub const DEFAULT_CONFIG_NAME: &str = "RatioSampler";
const TEMP_ARCHIVE_NAME: &str = "~ratio-sampler-probe.7z";

/// What to do when probing a single file fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the whole run on the first failed probe.
    #[default]
    Abort,
    /// Log the failure, count it against the group and keep going.
    Skip,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompressorConfig {
    /// Compressor executable. Auto-detected when unset.
    #[serde(default)]
    pub program: Option<String>,
    /// Extra arguments for the archive-creation step, e.g. `-mx=9`.
    #[serde(default)]
    pub create_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub root_paths: Vec<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub temp_archive: Option<PathBuf>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub skip_unreadable: bool,
    #[serde(default)]
    pub compressor: CompressorConfig,
}

fn default_sample_size() -> usize {
    DEFAULT_SAMPLE_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_paths: Vec::new(),
            ignore_patterns: Vec::new(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            seed: None,
            temp_archive: None,
            failure_policy: FailurePolicy::default(),
            skip_unreadable: false,
            compressor: CompressorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Shared archive path every probe writes to.
    pub fn temp_archive_path(&self) -> PathBuf {
        self.temp_archive
            .clone()
            .unwrap_or_else(|| env::temp_dir().join(TEMP_ARCHIVE_NAME))
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_size == 0 {
            return Err(Error::Other("sample_size must be at least 1".to_string()));
        }
        if self.root_paths.is_empty() {
            return Err(Error::Other("no root paths to scan".to_string()));
        }
        // 7-Zip appends `.7z` to archive names without one.
        let temp_archive = self.temp_archive_path();
        let has_7z_suffix = temp_archive
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("7z"));
        if !has_7z_suffix {
            return Err(Error::Other(format!(
                "temp_archive must end in .7z: {}",
                temp_archive.display()
            )));
        }
        Ok(())
    }
}

/// Layered load: `RatioSampler.toml` (or the file named by
/// `RATIO_SAMPLER_CONFIG`), then `RATIO_SAMPLER_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let name = env::var("RATIO_SAMPLER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_NAME.to_string());
    load_configuration_from(&name)
}

pub fn load_configuration_from(name: &str) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name(name).required(false))
        .add_source(
            Environment::with_prefix("RATIO_SAMPLER")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("root_paths")
                .with_list_parse_key("ignore_patterns")
                .with_list_parse_key("compressor.create_args")
                .try_parsing(true),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// Remove directories that are subdirectories of other directories in the list.
pub fn non_overlapping_directories<P: AsRef<Path>>(dirs: &[P]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for dir in dirs {
        let dir_path = dir.as_ref();

        if result.iter().any(|kept| dir_path.starts_with(kept)) {
            continue;
        }
        result.retain(|kept| !kept.starts_with(dir_path));
        result.push(dir_path.to_path_buf());
    }

    result
}
