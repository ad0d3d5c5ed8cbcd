//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace: the
//! parsed track model, the sink trait, the run plan and the error taxonomy.
//! Business crates depend on this crate only, reverse dependencies are
//! prohibited.
//!
//! ## Ownership Model
//! - The producer builds one `ParsedBatch` per input file.
//! - The batch is frozen into a `SharedBatch` (`Arc`) before fan-out, so each
//!   sink gets its own handle to the same immutable value.

mod batch;
mod error;
mod plan;
mod sink;

pub use batch::*;
pub use error::*;
pub use plan::*;
pub use sink::*;
