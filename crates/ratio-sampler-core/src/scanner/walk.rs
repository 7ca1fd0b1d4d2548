use super::groups::ExtensionGroups;
use crate::error::{Error, Result};
use crate::progress::ProgressReporter;
use glob::Pattern;
use std::io;
use std::path::{self, Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, warn};
use walkdir::WalkDir;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Sequential pre-order directory walk that files every regular file under
/// its extension. Within a directory, files are visited before subdirectories.
pub struct DirectoryScanner {
    ignore_patterns: Vec<Pattern>,
    skip_unreadable: bool,
    heartbeat: Duration,
}

impl DirectoryScanner {
    pub fn new(ignore_globs: &[String]) -> Self {
        let ignore_patterns = ignore_globs
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob, e);
                    None
                }
            })
            .collect();

        Self {
            ignore_patterns,
            skip_unreadable: false,
            heartbeat: HEARTBEAT_INTERVAL,
        }
    }

    /// Log and skip directories that cannot be read instead of failing the scan.
    pub fn skip_unreadable(mut self, skip: bool) -> Self {
        self.skip_unreadable = skip;
        self
    }

    pub fn with_heartbeat(mut self, interval: Duration) -> Self {
        self.heartbeat = interval;
        self
    }

    pub fn scan<P: AsRef<Path>>(
        &self,
        roots: &[P],
        reporter: &dyn ProgressReporter,
    ) -> Result<ExtensionGroups> {
        let mut groups = ExtensionGroups::new();
        let mut files_visited = 0usize;
        let mut last_beat = Instant::now();

        for root in roots {
            let root = absolute_root(root)?;
            let root = root.as_path();
            reporter.on_scan_start(root);

            let walker = WalkDir::new(root)
                .follow_links(false)
                .sort_by(|a, b| a.file_type().is_dir().cmp(&b.file_type().is_dir()))
                .into_iter()
                .filter_entry(|entry| !self.is_ignored(entry.path()));

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        let path = err
                            .path()
                            .map(Path::to_path_buf)
                            .unwrap_or_else(|| root.to_path_buf());
                        if self.skip_unreadable {
                            warn!("Skipping unreadable path {}: {}", path.display(), err);
                            continue;
                        }
                        let source = err
                            .into_io_error()
                            .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop"));
                        return Err(Error::Scan { path, source });
                    }
                };

                if !entry.file_type().is_file() {
                    continue;
                }

                groups.insert(entry.into_path());
                files_visited += 1;

                if last_beat.elapsed() >= self.heartbeat {
                    reporter.on_scan_progress(files_visited);
                    last_beat = Instant::now();
                }
            }
        }

        Ok(groups)
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
    }
}

/// Resolve `root` against the working directory without following symlinks.
pub fn absolute_root<P: AsRef<Path>>(root: P) -> Result<PathBuf> {
    let root = root.as_ref();
    path::absolute(root).map_err(|source| Error::Scan {
        path: root.to_path_buf(),
        source,
    })
}
