//! # Dispatcher
//!
//! Fan-out of parsed batches to sinks.
//!
//! Responsibilities:
//! - consume `SharedBatch` values from the producer channel
//! - deliver each batch to every sink, in arrival order
//! - run each sink on its own queue and worker task, so a failing sink does
//!   not stop the others
//! - drain queues on shutdown and report what each sink did

pub mod dispatcher;
pub mod error;
pub mod handle;
pub mod metrics;
pub mod shutdown;
pub mod sinks;

pub use contracts::{DataSink, SharedBatch};
pub use dispatcher::{create_dispatcher, Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use error::DispatcherError;
pub use handle::{BatchFailure, SinkHandle, SinkReport, Supervision};
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use shutdown::{ShutdownListener, ShutdownSignal};
pub use sinks::{spawn_sink, BatchEncoder, FolderSink, JsonEncoder, LinkListEncoder};
