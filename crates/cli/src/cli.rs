//! CLI argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Tracklist - export CSV playlist dumps
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "tracklist",
    author,
    version,
    about = "Export CSV playlist dumps to JSON records and Spotify link lists",
    long_about = "Reads every playlist CSV in a directory and writes one output file per \n\
                  input file and per selected format.\n\n\
                  Files must be named with letters, digits, '_' or '+' and end in '.csv'. \n\
                  Other entries are skipped with a warning."
)]
pub struct Cli {
    /// Directory holding the CSV files (absolute path)
    #[arg(long, env = "TRACKLIST_DIR")]
    pub dir: Option<String>,

    /// Write JSON records to <out>/json/<name>.json
    #[arg(long, env = "TRACKLIST_JSON")]
    pub json: bool,

    /// Write Spotify track links to <out>/links/<name>.txt
    #[arg(long, env = "TRACKLIST_LINK")]
    pub link: bool,

    /// Folder the output folders are created in [default: .]
    #[arg(long, env = "TRACKLIST_OUT")]
    pub out: Option<PathBuf>,

    /// Indent JSON output
    #[arg(long, env = "TRACKLIST_PRETTY")]
    pub pretty: bool,

    /// Record file and sink failures and carry on with the next file
    #[arg(long, env = "TRACKLIST_KEEP_GOING")]
    pub keep_going: bool,

    /// Per-sink queue capacity [default: 16]
    #[arg(long, env = "TRACKLIST_QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,

    /// Run plan file (TOML or JSON). Flags override its values.
    #[arg(short, long, env = "TRACKLIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", env = "TRACKLIST_METRICS_PORT")]
    pub metrics_port: u16,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, env = "TRACKLIST_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "compact", env = "TRACKLIST_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl Cli {
    /// Prometheus port, if enabled
    pub fn metrics_port(&self) -> Option<u16> {
        (self.metrics_port != 0).then_some(self.metrics_port)
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
