//! Run metrics
//!
//! Recorders push to the `metrics` facade (a no-op unless an exporter is
//! installed). `RunAggregator` keeps the same numbers in memory for the
//! end-of-run summary.

use std::fmt;
use std::time::Duration;

use metrics::{counter, histogram};

/// Record one parsed input file
pub fn record_file_parsed(records: usize, parse_ms: f64) {
    counter!("tracklist_files_parsed_total").increment(1);
    counter!("tracklist_records_parsed_total").increment(records as u64);
    histogram!("tracklist_records_per_file").record(records as f64);
    histogram!("tracklist_parse_duration_ms").record(parse_ms);
}

/// Record a directory entry that did not match the input pattern
pub fn record_file_skipped() {
    counter!("tracklist_files_skipped_total").increment(1);
}

/// Record an input file that could not be parsed
pub fn record_file_failed() {
    counter!("tracklist_files_failed_total").increment(1);
}

/// Record a batch persisted by a sink
pub fn record_batch_written(sink_name: &str, records: usize) {
    counter!(
        "tracklist_batches_written_total",
        "sink" => sink_name.to_string(),
        "status" => "success"
    )
    .increment(1);
    counter!(
        "tracklist_records_written_total",
        "sink" => sink_name.to_string()
    )
    .increment(records as u64);
}

/// Record a batch a sink failed to persist
pub fn record_batch_failed(sink_name: &str) {
    counter!(
        "tracklist_batches_written_total",
        "sink" => sink_name.to_string(),
        "status" => "failure"
    )
    .increment(1);
}

/// Record the wall time of a whole run
pub fn record_run_duration(duration: Duration) {
    histogram!("tracklist_run_duration_seconds").record(duration.as_secs_f64());
}

/// In-memory totals for one run, fed by the producer
#[derive(Debug, Clone, Default)]
pub struct RunAggregator {
    /// Directory entries listed
    pub files_discovered: u64,
    /// Entries not matching the input pattern
    pub files_skipped: u64,
    /// Files parsed into a batch
    pub files_parsed: u64,
    /// Files that failed to parse
    pub files_failed: u64,
    /// Tracks across every parsed file
    pub total_records: u64,
    /// Tracks per parsed file
    pub records_per_file: RunningStats,
    /// Parse time per file (ms)
    pub parse_ms: RunningStats,
}

impl RunAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for the discovery listing
    pub fn observe_discovery(&mut self, entries: usize, skipped: usize) {
        self.files_discovered += entries as u64;
        self.files_skipped += skipped as u64;
        for _ in 0..skipped {
            record_file_skipped();
        }
    }

    /// Account for one parsed file
    pub fn observe_parsed(&mut self, records: usize, parse_ms: f64) {
        self.files_parsed += 1;
        self.total_records += records as u64;
        self.records_per_file.push(records as f64);
        self.parse_ms.push(parse_ms);
        record_file_parsed(records, parse_ms);
    }

    /// Account for one file that failed to parse
    pub fn observe_failed(&mut self) {
        self.files_failed += 1;
        record_file_failed();
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            files_discovered: self.files_discovered,
            files_skipped: self.files_skipped,
            files_parsed: self.files_parsed,
            files_failed: self.files_failed,
            total_records: self.total_records,
            records_per_file: StatsSummary::from(&self.records_per_file),
            parse_ms: StatsSummary::from(&self.parse_ms),
        }
    }
}

/// Snapshot of a `RunAggregator`
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub files_discovered: u64,
    pub files_skipped: u64,
    pub files_parsed: u64,
    pub files_failed: u64,
    pub total_records: u64,
    pub records_per_file: StatsSummary,
    pub parse_ms: StatsSummary,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Files discovered: {}", self.files_discovered)?;
        writeln!(f, "Files skipped: {}", self.files_skipped)?;
        writeln!(f, "Files parsed: {}", self.files_parsed)?;
        if self.files_failed > 0 {
            writeln!(f, "Files failed: {}", self.files_failed)?;
        }
        writeln!(f, "Records: {}", self.total_records)?;
        writeln!(f, "Records per file: {}", self.records_per_file)?;
        write!(f, "Parse time (ms): {}", self.parse_ms)
    }
}

/// Min / max / mean / standard deviation of a series
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            return write!(f, "N/A");
        }
        write!(
            f,
            "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
            self.min, self.max, self.mean, self.std_dev, self.count
        )
    }
}

/// Streaming mean and variance (Welford)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance, 0 with fewer than two values
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        for value in [2.0, 4.0, 6.0, 8.0] {
            stats.push(value);
        }

        assert_eq!(stats.count(), 4);
        assert!((stats.mean() - 5.0).abs() < 1e-10);
        assert!((stats.min() - 2.0).abs() < 1e-10);
        assert!((stats.max() - 8.0).abs() < 1e-10);
        assert!((stats.variance() - 20.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_aggregator_totals() {
        let mut aggregator = RunAggregator::new();
        aggregator.observe_discovery(4, 1);
        aggregator.observe_parsed(10, 1.5);
        aggregator.observe_parsed(0, 0.5);
        aggregator.observe_failed();

        let summary = aggregator.summary();
        assert_eq!(summary.files_discovered, 4);
        assert_eq!(summary.files_skipped, 1);
        assert_eq!(summary.files_parsed, 2);
        assert_eq!(summary.files_failed, 1);
        assert_eq!(summary.total_records, 10);
        assert_eq!(summary.records_per_file.count, 2);
        assert!((summary.records_per_file.mean - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_display() {
        let text = RunAggregator::new().summary().to_string();
        assert!(text.contains("Files parsed: 0"));
        assert!(text.contains("Records per file: N/A"));
        assert!(!text.contains("Files failed"));
    }
}
