//! Dispatcher - main loop for fan-out to sinks

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use contracts::{SharedBatch, SinkConfig};

use crate::error::DispatcherError;
use crate::handle::{SinkHandle, SinkReport, Supervision};
use crate::sinks::spawn_sink;

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Sink configurations
    pub sinks: Vec<SinkConfig>,
    /// Folder the sink folders live under
    pub output_root: PathBuf,
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    supervision: Supervision,
    input_rx: mpsc::Receiver<SharedBatch>,
}

impl DispatcherBuilder {
    /// Create a new DispatcherBuilder
    pub fn new(
        config: DispatcherConfig,
        supervision: Supervision,
        input_rx: mpsc::Receiver<SharedBatch>,
    ) -> Self {
        Self {
            config,
            supervision,
            input_rx,
        }
    }

    /// Build the dispatcher and start one worker per sink
    #[instrument(
        name = "dispatcher_builder_build",
        skip(self),
        fields(sink_count = self.config.sinks.len())
    )]
    pub fn build(self) -> Result<Dispatcher, DispatcherError> {
        let mut handles = Vec::with_capacity(self.config.sinks.len());
        for sink_config in &self.config.sinks {
            // Workers already spawned stop once their handles are dropped
            handles.push(spawn_sink(
                sink_config,
                &self.config.output_root,
                &self.supervision,
            )?);
            debug!(sink = %sink_config.name, sink_type = ?sink_config.sink_type, "Sink started");
        }

        Ok(Dispatcher {
            handles,
            input_rx: self.input_rx,
            supervision: self.supervision,
        })
    }
}

/// The main Dispatcher that fans out batches to sinks
pub struct Dispatcher {
    handles: Vec<SinkHandle>,
    input_rx: mpsc::Receiver<SharedBatch>,
    supervision: Supervision,
}

impl Dispatcher {
    /// Create a dispatcher over sink handles spawned by the caller
    pub fn with_handles(
        handles: Vec<SinkHandle>,
        supervision: Supervision,
        input_rx: mpsc::Receiver<SharedBatch>,
    ) -> Self {
        Self {
            handles,
            input_rx,
            supervision,
        }
    }

    /// Run the dispatcher main loop
    ///
    /// Every batch is delivered to every sink still consuming, in arrival
    /// order. Returns when the input channel is closed and every worker has
    /// drained its queue.
    #[instrument(name = "dispatcher_run", skip(self))]
    pub async fn run(mut self) -> Vec<Result<SinkReport, DispatcherError>> {
        info!(sinks = self.handles.len(), "Dispatcher started");

        let mut batch_count: u64 = 0;

        while let Some(batch) = self.input_rx.recv().await {
            batch_count += 1;
            self.dispatch_batch(&batch).await;
        }

        info!(
            batches = batch_count,
            "Dispatcher input closed, shutting down"
        );
        self.supervision.shutdown.trigger();

        let reports = Self::shutdown_handles(self.handles).await;

        info!("Dispatcher shutdown complete");
        reports
    }

    /// Spawn the dispatcher as a background task
    pub fn spawn(self) -> JoinHandle<Vec<Result<SinkReport, DispatcherError>>> {
        tokio::spawn(async move { self.run().await })
    }

    async fn dispatch_batch(&self, batch: &SharedBatch) {
        for handle in &self.handles {
            if let Err(e) = handle.accept(Arc::clone(batch)).await {
                warn!(sink = handle.name(), error = %e, "Batch not delivered");
            }
        }
    }

    async fn shutdown_handles(handles: Vec<SinkHandle>) -> Vec<Result<SinkReport, DispatcherError>> {
        let mut reports = Vec::with_capacity(handles.len());
        for handle in handles {
            reports.push(handle.shutdown().await);
        }
        reports
    }
}

/// Convenience function to create a dispatcher from sink configs
#[instrument(name = "dispatcher_create", skip_all)]
pub fn create_dispatcher(
    sink_configs: Vec<SinkConfig>,
    output_root: impl Into<PathBuf>,
    supervision: Supervision,
    input_rx: mpsc::Receiver<SharedBatch>,
) -> Result<Dispatcher, DispatcherError> {
    let config = DispatcherConfig {
        sinks: sink_configs,
        output_root: output_root.into(),
    };
    DispatcherBuilder::new(config, supervision, input_rx).build()
}
