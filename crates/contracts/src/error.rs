//! Layered error definitions
//!
//! Categorized by source: path / io / format / serialization / config.
//! Every error also reports the `FailureDomain` it belongs to, which is what
//! the coordinator's `FailurePolicy` keys on.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    /// Listing the input directory
    ReadDir,
    /// Reading the run plan file
    ReadPlan,
    /// Opening an input file
    Open,
    /// Reading an input file
    Read,
    /// Creating a sink's output directory
    CreateDir,
    /// Creating an output file
    Create,
    /// Writing an output file
    Write,
}

impl IoOp {
    /// Domain an I/O failure of this kind belongs to
    pub fn domain(self) -> FailureDomain {
        match self {
            Self::ReadDir | Self::ReadPlan => FailureDomain::Run,
            Self::Open | Self::Read => FailureDomain::File,
            Self::CreateDir | Self::Create | Self::Write => FailureDomain::Sink,
        }
    }
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Self::ReadDir => "read directory",
            Self::ReadPlan => "read run plan",
            Self::Open => "open",
            Self::Read => "read",
            Self::CreateDir => "create directory",
            Self::Create => "create file",
            Self::Write => "write",
        };
        f.write_str(op)
    }
}

/// Where a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureDomain {
    /// Affects the whole run (bad root directory, unreadable listing, config)
    Run,
    /// Affects one input file
    File,
    /// Affects one sink's output for one batch
    Sink,
}

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Path Errors =====
    /// Root directory argument failed validation
    #[error("invalid directory '{path}': {message}")]
    Path { path: String, message: String },

    // ===== IO Errors =====
    /// Filesystem operation failed
    #[error("failed to {op} '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        op: IoOp,
        #[source]
        source: std::io::Error,
    },

    // ===== Input Errors =====
    /// Malformed tabular input
    #[error("malformed input '{}': {message}", .path.display())]
    Format {
        path: PathBuf,
        /// 1-based data row (header excluded), when known
        row: Option<u64>,
        message: String,
    },

    // ===== Output Errors =====
    /// Structured encoding failed
    #[error("failed to serialize '{}': {message}", .path.display())]
    Serialization { path: PathBuf, message: String },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },
}

impl ContractError {
    /// Create path validation error
    pub fn path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Path {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create io error for the given operation
    pub fn io(op: IoOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            op,
            source,
        }
    }

    /// Create format error
    pub fn format(path: impl Into<PathBuf>, row: Option<u64>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            row,
            message: message.into(),
        }
    }

    /// Create serialization error
    pub fn serialization(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Serialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Failure domain of this error
    pub fn domain(&self) -> FailureDomain {
        match self {
            Self::Path { .. } | Self::ConfigParse { .. } | Self::ConfigValidation { .. } => {
                FailureDomain::Run
            }
            Self::Io { op, .. } => op.domain(),
            Self::Format { .. } => FailureDomain::File,
            Self::Serialization { .. } => FailureDomain::Sink,
        }
    }
}
