//! Coordinator lifecycle

use tracing::debug;

use crate::error::{CliError, Result};

/// Phase of one export run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    /// Validating the root directory and listing it
    Discovering,
    /// Producer parsing files, sinks persisting batches
    Draining,
    /// Producer finished, sink queues closing
    ShuttingDown,
    Done,
}

impl PipelineState {
    /// The only state reachable from `self`
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Discovering),
            Self::Discovering => Some(Self::Draining),
            Self::Draining => Some(Self::ShuttingDown),
            Self::ShuttingDown => Some(Self::Done),
            Self::Done => None,
        }
    }

    pub fn can_transition_to(self, to: Self) -> bool {
        self.next() == Some(to)
    }
}

/// Guarded holder for the current state
#[derive(Debug, Default)]
pub struct StateMachine {
    state: PipelineState,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Move to `to`
    ///
    /// # Errors
    /// `CliError::IllegalTransition` if `to` does not directly follow the
    /// current state.
    pub fn advance(&mut self, to: PipelineState) -> Result<()> {
        if !self.state.can_transition_to(to) {
            return Err(CliError::IllegalTransition {
                from: self.state,
                to,
            });
        }
        debug!(from = ?self.state, to = ?to, "Pipeline state transition");
        self.state = to;
        Ok(())
    }
}
