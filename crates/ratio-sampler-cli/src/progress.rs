use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use ratio_sampler_core::report::format_probe_line;
use ratio_sampler_core::{Error, GroupResult, ProbeResult, ProgressReporter};
use std::cell::RefCell;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// CLI progress reporter.
///
/// - Scan phase: spinner on a terminal, otherwise space-separated heartbeat counts on stdout
/// - Probe phase: one stdout line per probed file, spinner shows the current group
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
    interactive: bool,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
            interactive: Term::stderr().is_term(),
        }
    }

    fn spinner(&self, message: String) {
        if !self.interactive {
            return;
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars(TICK_CHARS));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        if let Some(old) = self.bar.replace(Some(pb)) {
            old.finish_and_clear();
        }
    }

    fn finish_bar(&self) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }

    /// Print a stdout line without tearing the spinner.
    fn print_line(&self, line: &str) {
        match self.bar.borrow().as_ref() {
            Some(pb) => pb.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }
}

impl Drop for CliReporter {
    fn drop(&mut self) {
        self.finish_bar();
    }
}

impl Default for CliReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, root: &Path) {
        if self.interactive {
            self.spinner(format!("Scanning {}...", root.display()));
        } else {
            println!("scanning {}...", root.display());
        }
    }

    fn on_scan_progress(&self, files_visited: usize) {
        match self.bar.borrow().as_ref() {
            Some(pb) => pb.set_message(format!("Scanning... {} files found", files_visited)),
            None => {
                print!("{} ", files_visited);
                let _ = io::stdout().flush();
            }
        }
    }

    fn on_scan_complete(&self, total_files: usize, groups: usize, duration_secs: f64) {
        self.finish_bar();
        if !self.interactive {
            println!();
        }
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} files, {} extensions in {:.2}s",
            total_files, groups, duration_secs
        );
    }

    fn on_group_start(&self, extension: &str, sample_count: usize, group_size: usize) {
        self.spinner(format!(
            "Probing \"{}\": {} of {} files",
            extension, sample_count, group_size
        ));
    }

    fn on_probe_complete(&self, path: &Path, result: &ProbeResult) {
        self.print_line(&format_probe_line(path, result));
    }

    fn on_probe_failed(&self, path: &Path, error: &Error) {
        let message = format!("  \x1b[31m✗\x1b[0m {}: {}", path.display(), error);
        match self.bar.borrow().as_ref() {
            Some(pb) => pb.suspend(|| eprintln!("{message}")),
            None => eprintln!("{message}"),
        }
    }

    fn on_group_complete(&self, _result: &GroupResult) {
        self.finish_bar();
    }
}
