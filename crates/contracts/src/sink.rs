//! DataSink trait - Dispatcher output interface
//!
//! Defines the abstract interface for Sinks.

use std::path::PathBuf;

use crate::{ContractError, ParsedBatch};

/// Outcome of persisting one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// File the batch was written to
    pub path: PathBuf,
    /// Number of tracks written
    pub records: usize,
    /// Bytes written
    pub bytes: usize,
}

/// Data output trait
///
/// All sink implementations must implement this trait.
#[trait_variant::make(DataSink: Send)]
pub trait LocalDataSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Persist one parsed batch
    ///
    /// # Errors
    /// Returns write error (should include the failing path)
    async fn write(&mut self, batch: &ParsedBatch) -> Result<WriteReport, ContractError>;

    /// Flush buffer (if any)
    async fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    async fn close(&mut self) -> Result<(), ContractError>;
}
