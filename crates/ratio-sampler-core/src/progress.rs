use crate::aggregate::GroupResult;
use crate::error::Error;
use crate::probe::ProbeResult;
use std::path::Path;

/// Trait for reporting sampling progress.
///
/// The CLI implements it with indicatif spinners and plain stdout lines.
/// All methods have default no-op implementations.
pub trait ProgressReporter {
    fn on_scan_start(&self, _root: &Path) {}
    /// Heartbeat; called at most once per second while scanning.
    fn on_scan_progress(&self, _files_visited: usize) {}
    fn on_scan_complete(&self, _total_files: usize, _groups: usize, _duration_secs: f64) {}
    fn on_group_start(&self, _extension: &str, _sample_count: usize, _group_size: usize) {}
    fn on_probe_complete(&self, _path: &Path, _result: &ProbeResult) {}
    fn on_probe_failed(&self, _path: &Path, _error: &Error) {}
    fn on_group_complete(&self, _result: &GroupResult) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
