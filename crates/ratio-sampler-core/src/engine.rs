use crate::aggregate::{GroupAggregator, GroupResult};
use crate::config::{self, AppConfig, FailurePolicy};
use crate::error::Result;
use crate::probe::{CompressionProber, Compressor};
use crate::progress::ProgressReporter;
use crate::report;
use crate::sampler::Sampler;
use crate::scanner::{absolute_root, DirectoryScanner, ExtensionGroup, ExtensionGroups};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct SamplingEngine<C: Compressor> {
    config: AppConfig,
    sampler: Sampler,
    prober: CompressionProber<C>,
}

#[derive(Debug)]
pub struct RunSummary {
    /// Per-extension results, sorted ascending by average ratio.
    pub results: Vec<GroupResult>,
    pub total_files: usize,
    pub files_probed: usize,
    pub probes_failed: usize,
    /// Extensions where every sampled probe failed.
    pub failed_groups: Vec<String>,
    pub scan_duration: Duration,
    pub probe_duration: Duration,
}

impl<C: Compressor> SamplingEngine<C> {
    pub fn new(config: AppConfig, compressor: C) -> Self {
        let sampler = match config.seed {
            Some(seed) => Sampler::seeded(config.sample_size, seed),
            None => Sampler::new(config.sample_size),
        };
        let prober = CompressionProber::new(compressor, config.temp_archive_path());
        Self {
            config,
            sampler,
            prober,
        }
    }

    pub fn with_sampler(mut self, sampler: Sampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the full pipeline:
    /// 1. Scan roots into extension groups
    /// 2. Sample and probe each group in first-seen order
    /// 3. Sort the group results by average ratio
    pub fn run(&mut self, reporter: &dyn ProgressReporter) -> Result<RunSummary> {
        self.config.validate()?;

        // Phase 1: Scan
        info!("Scanning files...");
        let scan_start = Instant::now();
        let groups = self.scan(reporter)?;
        let scan_duration = scan_start.elapsed();
        let total_files = groups.total_files();
        reporter.on_scan_complete(total_files, groups.len(), scan_duration.as_secs_f64());
        debug!(
            "Scan completed in {:.2}s: {} files in {} extension groups",
            scan_duration.as_secs_f64(),
            total_files,
            groups.len(),
        );

        // Phase 2: Probe
        info!(
            "Probing up to {} files per extension...",
            self.sampler.sample_size()
        );
        let probe_start = Instant::now();
        let mut results = Vec::with_capacity(groups.len());
        let mut failed_groups = Vec::new();
        let mut files_probed = 0;
        let mut probes_failed = 0;

        for group in &groups {
            let aggregator = self.probe_group(group, reporter)?;
            files_probed += aggregator.count();
            let failed = aggregator.failed();
            probes_failed += failed;

            match aggregator.finish() {
                Some(result) => {
                    reporter.on_group_complete(&result);
                    results.push(result);
                }
                None => {
                    warn!(
                        "No successful probes for \"{}\" ({} failed)",
                        group.extension, failed
                    );
                    failed_groups.push(group.extension.clone());
                }
            }
        }
        let probe_duration = probe_start.elapsed();
        debug!(
            "Probing completed in {:.2}s: {} probed, {} failed",
            probe_duration.as_secs_f64(),
            files_probed,
            probes_failed,
        );

        // Phase 3: Order
        report::sort_by_average(&mut results);

        Ok(RunSummary {
            results,
            total_files,
            files_probed,
            probes_failed,
            failed_groups,
            scan_duration,
            probe_duration,
        })
    }

    pub fn scan(&self, reporter: &dyn ProgressReporter) -> Result<ExtensionGroups> {
        let roots = self
            .config
            .root_paths
            .iter()
            .map(absolute_root)
            .collect::<Result<Vec<_>>>()?;
        let roots = config::non_overlapping_directories(&roots);
        info!("Processing directories: {:?}", roots);
        DirectoryScanner::new(&self.config.ignore_patterns)
            .skip_unreadable(self.config.skip_unreadable)
            .scan(&roots, reporter)
    }

    /// Sample one group and probe each pick, honoring the failure policy.
    pub fn probe_group(
        &mut self,
        group: &ExtensionGroup,
        reporter: &dyn ProgressReporter,
    ) -> Result<GroupAggregator> {
        let sample = self.sampler.sample(&group.paths);
        reporter.on_group_start(&group.extension, sample.len(), group.paths.len());

        let mut aggregator = GroupAggregator::new(group.extension.clone(), group.paths.len());
        for path in &sample {
            match self.prober.probe(path) {
                Ok(result) => {
                    reporter.on_probe_complete(path, &result);
                    aggregator.push(result.ratio);
                }
                Err(err) => {
                    reporter.on_probe_failed(path, &err);
                    if self.config.failure_policy == FailurePolicy::Abort {
                        return Err(err);
                    }
                    warn!("Skipping {}: {}", path.display(), err);
                    aggregator.record_failure();
                }
            }
        }
        Ok(aggregator)
    }
}
