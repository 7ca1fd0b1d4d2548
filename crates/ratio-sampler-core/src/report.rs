use crate::aggregate::GroupResult;
use crate::error::Result;
use crate::probe::ProbeResult;
use std::io::{self, Write};
use std::path::Path;

const CSV_HEADER: [&str; 7] = [
    "extension",
    "group_size",
    "sample_count",
    "failed_count",
    "avg_ratio",
    "min_ratio",
    "max_ratio",
];

/// Sort ascending by average ratio.
///
/// The sort is stable, so groups with equal averages keep their
/// first-seen extension order.
pub fn sort_by_average(results: &mut [GroupResult]) {
    results.sort_by(|a, b| a.avg_ratio.total_cmp(&b.avg_ratio));
}

/// `<avg>, <min>, <max>, "<EXT>"`
pub fn format_group_line(result: &GroupResult) -> String {
    format!(
        "{}, {}, {}, \"{}\"",
        result.avg_ratio, result.min_ratio, result.max_ratio, result.extension
    )
}

/// `<original> <compressed> <ratio> <path>`
pub fn format_probe_line(path: &Path, result: &ProbeResult) -> String {
    format!(
        "{} {} {} {}",
        result.original_size,
        result.compressed_size,
        result.ratio,
        path.display()
    )
}

/// One line per group, in the order given.
pub fn write_report<W: Write>(out: &mut W, results: &[GroupResult]) -> io::Result<()> {
    for result in results {
        writeln!(out, "{}", format_group_line(result))?;
    }
    out.flush()
}

/// CSV export with a header row.
pub fn write_csv<W: Write>(out: W, results: &[GroupResult]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    if results.is_empty() {
        writer.write_record(CSV_HEADER)?;
    }
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}
