//! Pipeline coordination module.

mod orchestrator;
mod state;
mod stats;

pub use orchestrator::{Pipeline, PipelineConfig};
pub use state::{PipelineState, StateMachine};
pub use stats::{FileFailure, RunStats};
