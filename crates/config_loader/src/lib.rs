//! # Config Loader
//!
//! Run plan loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON run plan files
//! - Validate sink configuration
//! - Generate `RunPlan`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let plan = ConfigLoader::load_from_path(Path::new("tracklist.toml")).unwrap();
//! println!("Sinks: {}", plan.sinks.len());
//! ```

mod validator;

pub use contracts::RunPlan;

use contracts::{ContractError, IoOp};
use std::path::Path;

/// Run plan file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (recommended)
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Decode a run plan, without validating it
    fn parse(self, content: &str) -> Result<RunPlan, ContractError> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| ContractError::ConfigParse {
                message: format!("run plan TOML parse error: {e}"),
                source: Some(Box::new(e)),
            }),
            Self::Json => serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
                message: format!("run plan JSON parse error: {e}"),
                source: Some(Box::new(e)),
            }),
        }
    }
}

/// Run plan loader
///
/// Provides static methods to load a plan from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a run plan from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<RunPlan, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load a run plan from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<RunPlan, ContractError> {
        let plan = format.parse(content)?;
        validator::validate(&plan)?;
        Ok(plan)
    }

    /// Validate a plan assembled elsewhere (e.g. from CLI flags)
    pub fn validate(plan: &RunPlan) -> Result<(), ContractError> {
        validator::validate(plan)
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    fn read_file(path: &Path) -> Result<String, ContractError> {
        std::fs::read_to_string(path).map_err(|e| ContractError::io(IoOp::ReadPlan, path, e))
    }
}
