//! Error types for CLI operations.

use contracts::ContractError;
use dispatcher::DispatcherError;
use thiserror::Error;

use crate::pipeline::PipelineState;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Input, output or run plan error
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// Sink setup or worker error
    #[error(transparent)]
    Dispatcher(#[from] DispatcherError),

    /// Coordinator state machine misuse
    #[error("illegal pipeline transition {from:?} -> {to:?}")]
    IllegalTransition {
        from: PipelineState,
        to: PipelineState,
    },

    /// Production task did not complete
    #[error("production task failed: {message}")]
    Producer { message: String },

    /// Run finished under --keep-going with recorded failures
    #[error("{count} failure(s) recorded during the run")]
    FailuresRecorded { count: usize },
}

impl CliError {
    pub fn producer(message: impl Into<String>) -> Self {
        Self::Producer {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
