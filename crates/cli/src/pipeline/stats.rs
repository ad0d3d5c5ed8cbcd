//! Run statistics and the end-of-run summary.

use std::time::Duration;

use contracts::ContractError;
use dispatcher::SinkReport;
use observability::RunSummary;

/// An input file that could not be parsed
#[derive(Debug)]
pub struct FileFailure {
    pub file: String,
    pub error: ContractError,
}

/// Statistics from a pipeline run
#[derive(Debug, Default)]
pub struct RunStats {
    /// Discovery and parse totals
    pub run: RunSummary,

    /// One report per sink, in configuration order
    pub sinks: Vec<SinkReport>,

    /// Files skipped because they failed to parse (keep-going only)
    pub file_failures: Vec<FileFailure>,

    /// Total duration of the run
    pub duration: Duration,
}

impl RunStats {
    /// Batches persisted across every sink
    pub fn batches_written(&self) -> u64 {
        self.sinks.iter().map(|s| s.metrics.write_count).sum()
    }

    /// File failures plus sink failures
    pub fn failure_count(&self) -> usize {
        self.file_failures.len() + self.sinks.iter().map(|s| s.failures.len()).sum::<usize>()
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }

    /// Print the summary to stdout
    pub fn print_summary(&self) {
        println!("\n=== Export Summary ===\n");
        println!("{}", self.run);

        if !self.sinks.is_empty() {
            println!("\nSinks:");
            for sink in &self.sinks {
                println!(
                    "  - {}: {} written, {} failed, {} records",
                    sink.name,
                    sink.metrics.write_count,
                    sink.metrics.failure_count,
                    sink.metrics.records_written
                );
            }
        }

        if !self.is_clean() {
            println!("\nFailures:");
            for failure in &self.file_failures {
                println!("  - {}: {}", failure.file, failure.error);
            }
            for sink in &self.sinks {
                for failure in &sink.failures {
                    println!("  - {} [{}]: {}", failure.batch, sink.name, failure.error);
                }
            }
        }

        println!("\nFinished in {:.3}s", self.duration.as_secs_f64());
    }
}
