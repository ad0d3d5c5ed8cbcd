//! # Tracklist CLI
//!
//! Command line front end and pipeline coordinator.
//!
//! - Run plan assembly from flags, environment and an optional plan file
//! - Coordinator state machine driving discovery, production and fan-out
//! - End-of-run summary

pub mod cli;
pub mod commands;
pub mod error;
pub mod pipeline;

pub use cli::Cli;
pub use error::CliError;
pub use pipeline::{Pipeline, PipelineConfig, PipelineState, RunStats};
