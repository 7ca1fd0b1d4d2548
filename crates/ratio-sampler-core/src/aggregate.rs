use serde::Serialize;

/// Final statistics for one extension group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupResult {
    pub extension: String,
    /// Files discovered with this extension.
    pub group_size: usize,
    /// Probes that produced a ratio.
    pub sample_count: usize,
    /// Probes skipped after an error.
    pub failed_count: usize,
    pub avg_ratio: f64,
    pub min_ratio: f64,
    pub max_ratio: f64,
}

/// Running min/max/sum over the ratios of one group.
///
/// `min` starts at 1 and `max` at 0; they are starting points only, a
/// negative ratio still lowers `min` and nothing is clamped.
#[derive(Debug, Clone)]
pub struct GroupAggregator {
    extension: String,
    group_size: usize,
    min: f64,
    max: f64,
    sum: f64,
    count: usize,
    failed: usize,
}

impl GroupAggregator {
    pub fn new(extension: impl Into<String>, group_size: usize) -> Self {
        Self {
            extension: extension.into(),
            group_size,
            min: 1.0,
            max: 0.0,
            sum: 0.0,
            count: 0,
            failed: 0,
        }
    }

    pub fn push(&mut self, ratio: f64) {
        self.min = self.min.min(ratio);
        self.max = self.max.max(ratio);
        self.sum += ratio;
        self.count += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// `None` when no ratio was pushed (every probe in the group failed).
    pub fn finish(self) -> Option<GroupResult> {
        if self.count == 0 {
            return None;
        }
        Some(GroupResult {
            avg_ratio: self.sum / self.count as f64,
            extension: self.extension,
            group_size: self.group_size,
            sample_count: self.count,
            failed_count: self.failed,
            min_ratio: self.min,
            max_ratio: self.max,
        })
    }
}
