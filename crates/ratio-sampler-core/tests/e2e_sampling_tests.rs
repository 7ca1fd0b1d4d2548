use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

use ratio_sampler_core::probe::{ProcessOutput, ProcessRunner};
use ratio_sampler_core::scanner::normalized_extension;
use ratio_sampler_core::{
    AppConfig, Compressor, Error, FailurePolicy, ParseError, ProbeResult, ProgressReporter,
    Result, SamplingEngine, SevenZip, SilentReporter, SizePair,
};

/// Pretends to compress: `.TXT` shrinks to 10%, `.JPG` to 95%, anything else to 50%.
/// Files whose name is in `failing` make the create step fail.
#[derive(Default)]
struct FakeCompressor {
    failing: HashSet<String>,
    pending: Cell<Option<SizePair>>,
    probed: RefCell<Vec<PathBuf>>,
}

impl FakeCompressor {
    fn failing_on(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl Compressor for &FakeCompressor {
    fn compress_one_file(&self, input: &Path, archive: &Path) -> Result<()> {
        self.probed.borrow_mut().push(input.to_path_buf());
        let name = input.file_name().unwrap().to_string_lossy().into_owned();
        if self.failing.contains(&name) {
            return Err(Error::ExternalTool {
                command: format!("fake a {}", input.display()),
                status: "exit code 2".to_string(),
                stderr: "cannot open".to_string(),
            });
        }

        let original = fs::metadata(input)?.len();
        let compressed = match normalized_extension(input).as_str() {
            ".TXT" => original / 10,
            ".JPG" => original * 95 / 100,
            _ => original / 2,
        };
        fs::write(archive, b"fake archive")?;
        self.pending.set(Some(SizePair { original, compressed }));
        Ok(())
    }

    fn list_archive(&self, archive: &Path) -> Result<SizePair> {
        assert!(archive.exists(), "listing before the archive was created");
        self.pending
            .take()
            .ok_or_else(|| Error::Other("nothing compressed".to_string()))
    }
}

#[derive(Default)]
struct RecordingReporter {
    probe_lines: RefCell<Vec<(PathBuf, ProbeResult)>>,
    failures: RefCell<Vec<PathBuf>>,
    groups_started: RefCell<Vec<(String, usize, usize)>>,
}

impl ProgressReporter for RecordingReporter {
    fn on_group_start(&self, extension: &str, sample_count: usize, group_size: usize) {
        self.groups_started
            .borrow_mut()
            .push((extension.to_string(), sample_count, group_size));
    }

    fn on_probe_complete(&self, path: &Path, result: &ProbeResult) {
        self.probe_lines
            .borrow_mut()
            .push((path.to_path_buf(), *result));
    }

    fn on_probe_failed(&self, path: &Path, _error: &Error) {
        self.failures.borrow_mut().push(path.to_path_buf());
    }
}

/// Layout:
///   root/
///     a.TXT   (1000 bytes)
///     docs/
///       b.TXT (2000 bytes)
///     c.JPG   (1000 bytes)
fn create_test_tree() -> TempDir {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scan_root");
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("a.TXT"), vec![b'a'; 1000]).unwrap();
    fs::write(root.join("docs").join("b.TXT"), vec![b'b'; 2000]).unwrap();
    fs::write(root.join("c.JPG"), vec![0xFFu8; 1000]).unwrap();
    tmp
}

fn config_for(tmp: &TempDir, sample_size: usize) -> AppConfig {
    AppConfig {
        root_paths: vec![tmp.path().join("scan_root").to_string_lossy().into_owned()],
        sample_size,
        seed: Some(7),
        temp_archive: Some(tmp.path().join("probe.7z")),
        ..AppConfig::default()
    }
}

#[test]
fn test_full_sampling_run() {
    let tmp = create_test_tree();
    let compressor = FakeCompressor::default();
    let reporter = RecordingReporter::default();

    let mut engine = SamplingEngine::new(config_for(&tmp, 2), &compressor);
    let summary = engine.run(&reporter).unwrap();

    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.files_probed, 3);
    assert_eq!(summary.probes_failed, 0);
    assert_eq!(compressor.probed.borrow().len(), 3);

    // Lower average first: JPG (0.05) before TXT (0.9).
    let extensions: Vec<&str> = summary
        .results
        .iter()
        .map(|r| r.extension.as_str())
        .collect();
    assert_eq!(extensions, vec![".JPG", ".TXT"]);

    let jpg = &summary.results[0];
    assert_eq!(jpg.sample_count, 1);
    assert!((jpg.avg_ratio - 0.05).abs() < 1e-9);

    let txt = &summary.results[1];
    assert_eq!(txt.group_size, 2);
    assert_eq!(txt.sample_count, 2);
    assert!((txt.min_ratio - 0.9).abs() < 1e-9);
    assert!((txt.max_ratio - 0.9).abs() < 1e-9);

    assert_eq!(reporter.probe_lines.borrow().len(), 3);
    assert!(!tmp.path().join("probe.7z").exists());
}

#[test]
fn test_group_start_reports_sample_and_group_size() {
    let tmp = create_test_tree();
    let compressor = FakeCompressor::default();
    let reporter = RecordingReporter::default();

    let mut engine = SamplingEngine::new(config_for(&tmp, 10), &compressor);
    engine.run(&reporter).unwrap();

    let started = reporter.groups_started.borrow();
    assert_eq!(started.len(), 2);
    let txt = started.iter().find(|(ext, _, _)| ext == ".TXT").unwrap();
    assert_eq!((txt.1, txt.2), (2, 2));
}

#[test]
fn test_sample_size_bounds_probes() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scan_root");
    fs::create_dir_all(&root).unwrap();
    for i in 0..30 {
        fs::write(root.join(format!("f{i}.log")), vec![b'x'; 100 + i]).unwrap();
    }

    let compressor = FakeCompressor::default();
    let mut engine = SamplingEngine::new(config_for(&tmp, 5), &compressor);
    let summary = engine.run(&SilentReporter).unwrap();

    assert_eq!(summary.total_files, 30);
    assert_eq!(summary.files_probed, 5);
    let probed = compressor.probed.borrow();
    let unique: HashSet<&PathBuf> = probed.iter().collect();
    assert_eq!(unique.len(), 5);
}

#[test]
fn test_same_seed_probes_same_files() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scan_root");
    fs::create_dir_all(&root).unwrap();
    for i in 0..20 {
        fs::write(root.join(format!("f{i}.dat")), vec![b'x'; 64]).unwrap();
    }

    let first = FakeCompressor::default();
    SamplingEngine::new(config_for(&tmp, 4), &first)
        .run(&SilentReporter)
        .unwrap();
    let second = FakeCompressor::default();
    SamplingEngine::new(config_for(&tmp, 4), &second)
        .run(&SilentReporter)
        .unwrap();

    assert_eq!(*first.probed.borrow(), *second.probed.borrow());
}

#[test]
fn test_abort_policy_stops_on_first_failure() {
    let tmp = create_test_tree();
    let compressor = FakeCompressor::failing_on(&["c.JPG"]);
    let reporter = RecordingReporter::default();

    let mut engine = SamplingEngine::new(config_for(&tmp, 10), &compressor);
    let err = engine.run(&reporter).unwrap_err();

    assert!(matches!(err, Error::ExternalTool { .. }));
    assert_eq!(reporter.failures.borrow().len(), 1);
}

#[test]
fn test_skip_policy_counts_failures() {
    let tmp = create_test_tree();
    let compressor = FakeCompressor::failing_on(&["c.JPG", "a.TXT"]);
    let reporter = RecordingReporter::default();

    let mut config = config_for(&tmp, 10);
    config.failure_policy = FailurePolicy::Skip;
    let mut engine = SamplingEngine::new(config, &compressor);
    let summary = engine.run(&reporter).unwrap();

    assert_eq!(summary.probes_failed, 2);
    assert_eq!(summary.files_probed, 1);
    assert_eq!(summary.failed_groups, vec![".JPG".to_string()]);
    assert_eq!(summary.results.len(), 1);
    assert_eq!(summary.results[0].extension, ".TXT");
    assert_eq!(summary.results[0].failed_count, 1);
    assert!(!tmp.path().join("probe.7z").exists());
}

#[test]
fn test_missing_root_is_fatal() {
    let tmp = tempdir().unwrap();
    let compressor = FakeCompressor::default();

    let mut engine = SamplingEngine::new(config_for(&tmp, 10), &compressor);
    let err = engine.run(&SilentReporter).unwrap_err();

    assert!(matches!(err, Error::Scan { .. }));
    assert!(compressor.probed.borrow().is_empty());
}

/// Process runner that "creates" archives and answers listings with fixed text.
struct CannedSevenZip {
    listing: String,
}

impl ProcessRunner for CannedSevenZip {
    fn run(&self, _program: &str, args: &[OsString]) -> Result<ProcessOutput> {
        if args.first().map(|a| a == "a").unwrap_or(false) {
            let archive = &args[args.len() - 2];
            fs::write(archive, b"7z")?;
        }
        Ok(ProcessOutput {
            code: Some(0),
            stdout: self.listing.clone(),
            stderr: String::new(),
        })
    }
}

#[test]
fn test_seven_zip_adapter_through_engine() {
    let tmp = create_test_tree();
    let runner = CannedSevenZip {
        listing: "------------------- ----- ------------ ------------  ----\n\
                  2005-09-26 15:50:11 ....A      5203223      4146400  x\n"
            .to_string(),
    };
    let mut engine = SamplingEngine::new(config_for(&tmp, 10), SevenZip::with_runner("7z", runner));
    let summary = engine.run(&SilentReporter).unwrap();

    for result in &summary.results {
        assert!((result.avg_ratio - 0.2031).abs() < 1e-4);
    }
}

#[test]
fn test_listing_without_separator_is_parse_error() {
    let tmp = create_test_tree();
    let runner = CannedSevenZip {
        listing: "Listing archive: probe.7z\nType = 7z\n".to_string(),
    };
    let mut engine = SamplingEngine::new(config_for(&tmp, 10), SevenZip::with_runner("7z", runner));
    let err = engine.run(&SilentReporter).unwrap_err();

    assert!(matches!(err, Error::Parse(ParseError::MissingSeparator)));
    assert!(!tmp.path().join("probe.7z").exists());
}

#[test]
fn test_empty_file_reports_zero_ratio_under_abort_policy() {
    let tmp = tempdir().unwrap();
    let root = tmp.path().join("scan_root");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("__init__.py"), b"").unwrap();

    let runner = CannedSevenZip {
        listing: "------------------- ----- ------------ ------------  ----\n\
                  2024-01-01 00:00:00 ....A            0               __init__.py\n"
            .to_string(),
    };
    let config = config_for(&tmp, 10);
    assert_eq!(config.failure_policy, FailurePolicy::Abort);
    let mut engine = SamplingEngine::new(config, SevenZip::with_runner("7z", runner));
    let summary = engine.run(&SilentReporter).unwrap();

    assert_eq!(summary.results.len(), 1);
    let py = &summary.results[0];
    assert_eq!(py.extension, ".PY");
    assert_eq!(py.sample_count, 1);
    assert_eq!(py.avg_ratio, 0.0);
    assert_eq!(py.max_ratio, 0.0);
    assert_eq!(py.min_ratio, 0.0);
}

#[test]
fn test_relative_and_absolute_roots_do_not_double_count() {
    let tmp = tempfile::Builder::new()
        .prefix("engine-roots")
        .tempdir_in(".")
        .unwrap();
    let root = tmp.path().join("scan_root");
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("a.TXT"), vec![b'a'; 1000]).unwrap();
    fs::write(root.join("docs").join("b.TXT"), vec![b'b'; 2000]).unwrap();

    let relative_docs = Path::new(".")
        .join(tmp.path().file_name().unwrap())
        .join("scan_root")
        .join("docs");
    let config = AppConfig {
        root_paths: vec![
            relative_docs.to_string_lossy().into_owned(),
            root.to_string_lossy().into_owned(),
        ],
        seed: Some(7),
        temp_archive: Some(tmp.path().join("probe.7z")),
        ..AppConfig::default()
    };

    let fake = FakeCompressor::default();
    let mut engine = SamplingEngine::new(config, &fake);
    let summary = engine.run(&SilentReporter).unwrap();

    assert_eq!(summary.total_files, 2);
    assert!(fake.probed.borrow().iter().all(|p| p.is_absolute()));
}
