//! Command implementations.

mod run;

pub use run::{build_plan, run_export};
