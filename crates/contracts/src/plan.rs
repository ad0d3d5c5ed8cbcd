//! RunPlan - Config Loader output
//!
//! Describes one export run: where to read, where to write, which sinks are
//! active and how failures are handled.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Sink parameter: output directory name under the output root
pub const PARAM_DIR: &str = "dir";
/// Sink parameter: indent JSON output ("true" / "false")
pub const PARAM_PRETTY: &str = "pretty";
/// Sink parameter: URL prefix for link lists
pub const PARAM_LINK_PREFIX: &str = "link_prefix";

/// Complete export plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPlan {
    /// Root directory holding the CSV files (unset until provided)
    #[serde(default)]
    pub input_dir: Option<String>,

    /// Directory the sink folders are created under
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// What to do when a file or a sink fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Active sinks
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_root: default_output_root(),
            failure_policy: FailurePolicy::default(),
            sinks: Vec::new(),
        }
    }
}

impl RunPlan {
    /// Whether at least one sink is active
    pub fn has_sinks(&self) -> bool {
        !self.sinks.is_empty()
    }

    /// Whether a sink of the given type is active
    pub fn has_sink_type(&self, sink_type: SinkType) -> bool {
        self.sinks.iter().any(|s| s.sink_type == sink_type)
    }
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}

/// Failure handling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// First error of any kind aborts the run
    #[default]
    Abort,
    /// File and sink errors are recorded, the run keeps going
    Continue,
}

/// Sink output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink name
    pub name: String,

    /// Sink type
    pub sink_type: SinkType,

    /// Inbound queue capacity
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Type specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

/// Default per-sink queue capacity
pub fn default_queue_capacity() -> usize {
    16
}

impl SinkConfig {
    /// Default JSON sink
    pub fn json() -> Self {
        Self::of_type(SinkType::Json)
    }

    /// Default link list sink
    pub fn links() -> Self {
        Self::of_type(SinkType::Links)
    }

    fn of_type(sink_type: SinkType) -> Self {
        Self {
            name: sink_type.default_name().to_string(),
            sink_type,
            queue_capacity: default_queue_capacity(),
            params: HashMap::new(),
        }
    }

    /// Set a parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Output directory name, relative to the output root
    pub fn dir_name(&self) -> &str {
        self.params
            .get(PARAM_DIR)
            .map(String::as_str)
            .unwrap_or_else(|| self.sink_type.default_dir())
    }
}

/// Sink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkType {
    /// JSON array of track objects
    Json,
    /// One Spotify URL per line
    Links,
}

impl SinkType {
    /// Name used when none is configured
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Links => "links",
        }
    }

    /// Output directory used when none is configured
    pub fn default_dir(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Links => "links",
        }
    }

    /// Parameters this sink type understands
    pub fn known_params(self) -> &'static [&'static str] {
        match self {
            Self::Json => &[PARAM_DIR, PARAM_PRETTY],
            Self::Links => &[PARAM_DIR, PARAM_LINK_PREFIX],
        }
    }
}
