//! SinkHandle - manages a sink with isolated queue and worker task

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use contracts::{ContractError, DataSink, FailureDomain, FailurePolicy, SharedBatch};

use crate::error::DispatcherError;
use crate::metrics::{MetricsSnapshot, SinkMetrics};
use crate::shutdown::{ShutdownListener, ShutdownSignal};

/// Signals and policy shared by every sink worker of a run
#[derive(Debug, Clone)]
pub struct Supervision {
    /// Failure handling policy
    pub policy: FailurePolicy,
    /// Raised by the dispatcher once no more batches will be delivered
    pub shutdown: ShutdownSignal,
    /// Raised by whoever hits a fatal error, see [`Supervision::is_fatal`]
    pub abort: ShutdownSignal,
}

impl Supervision {
    /// Fresh signals with the given policy
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            shutdown: ShutdownSignal::new(),
            abort: ShutdownSignal::new(),
        }
    }

    /// Whether `error` ends the run
    ///
    /// Run level errors always do. File and sink errors only under
    /// `FailurePolicy::Abort`, otherwise they are recorded.
    pub fn is_fatal(&self, error: &ContractError) -> bool {
        self.policy == FailurePolicy::Abort || error.domain() == FailureDomain::Run
    }
}

/// A batch a sink could not persist
#[derive(Debug)]
pub struct BatchFailure {
    /// Base name of the batch
    pub batch: String,
    pub error: ContractError,
}

/// What a sink worker did over its lifetime
#[derive(Debug)]
pub struct SinkReport {
    pub name: String,
    pub metrics: MetricsSnapshot,
    pub failures: Vec<BatchFailure>,
}

impl SinkReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Handle to a running sink worker
pub struct SinkHandle {
    /// Sink name
    name: String,
    /// Channel to send batches to worker
    tx: mpsc::Sender<SharedBatch>,
    /// Shared metrics
    metrics: Arc<SinkMetrics>,
    /// Worker task handle
    worker_handle: JoinHandle<Vec<BatchFailure>>,
}

impl SinkHandle {
    /// Create a new SinkHandle and spawn the worker task
    pub fn spawn<S: DataSink + Send + 'static>(
        sink: S,
        queue_capacity: usize,
        supervision: &Supervision,
    ) -> Self {
        let name = sink.name().to_string();
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let metrics = Arc::new(SinkMetrics::new());

        let worker = SinkWorker {
            name: name.clone(),
            metrics: Arc::clone(&metrics),
            supervision: supervision.clone(),
        };
        let shutdown = supervision.shutdown.subscribe();

        let worker_handle = tokio::spawn(async move { worker.run(sink, rx, shutdown).await });

        Self {
            name,
            tx,
            metrics,
            worker_handle,
        }
    }

    /// Get sink name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Whether the worker has stopped consuming
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Deliver a batch, waiting for queue capacity
    ///
    /// # Errors
    /// `DispatcherError::SinkClosed` if the worker already stopped.
    pub async fn accept(&self, batch: SharedBatch) -> Result<(), DispatcherError> {
        match self.tx.send(batch).await {
            Ok(()) => {
                self.metrics
                    .set_queue_len(self.tx.max_capacity() - self.tx.capacity());
                Ok(())
            }
            Err(mpsc::error::SendError(batch)) => Err(DispatcherError::SinkClosed {
                name: self.name.clone(),
                batch: batch.base_name().to_string(),
            }),
        }
    }

    /// Stop accepting batches and wait for the worker to drain its queue
    #[instrument(name = "sink_handle_shutdown", skip(self), fields(sink = %self.name))]
    pub async fn shutdown(self) -> Result<SinkReport, DispatcherError> {
        drop(self.tx);
        let failures = self.worker_handle.await.map_err(|e| {
            error!(sink = %self.name, error = ?e, "Worker task panicked");
            DispatcherError::WorkerPanicked {
                name: self.name.clone(),
                message: e.to_string(),
            }
        })?;
        debug!(sink = %self.name, "SinkHandle shutdown complete");

        Ok(SinkReport {
            name: self.name,
            metrics: self.metrics.snapshot(),
            failures,
        })
    }
}

struct SinkWorker {
    name: String,
    metrics: Arc<SinkMetrics>,
    supervision: Supervision,
}

impl SinkWorker {
    /// Consume batches until the queue closes, the shutdown signal is raised
    /// with an empty queue, or a write fails fatally
    #[instrument(name = "sink_worker_loop", skip_all, fields(sink = %self.name))]
    async fn run<S: DataSink>(
        self,
        mut sink: S,
        mut rx: mpsc::Receiver<SharedBatch>,
        mut shutdown: ShutdownListener,
    ) -> Vec<BatchFailure> {
        debug!("Sink worker started");
        let mut failures = Vec::new();

        loop {
            let batch = tokio::select! {
                biased;
                next = rx.recv() => match next {
                    Some(batch) => batch,
                    None => break,
                },
                _ = shutdown.wait() => {
                    debug!("Shutdown signal received with empty queue");
                    break;
                }
            };
            self.metrics.set_queue_len(rx.len());

            match sink.write(&batch).await {
                Ok(report) => {
                    self.metrics.record_write(report.records);
                    observability::record_batch_written(&self.name, report.records);
                    debug!(
                        batch = batch.base_name(),
                        path = %report.path.display(),
                        records = report.records,
                        bytes = report.bytes,
                        "Batch written"
                    );
                }
                Err(e) => {
                    self.metrics.inc_failure_count();
                    observability::record_batch_failed(&self.name);
                    error!(batch = batch.base_name(), error = %e, "Write failed");
                    let fatal = self.supervision.is_fatal(&e);
                    failures.push(BatchFailure {
                        batch: batch.base_name().to_string(),
                        error: e,
                    });

                    if fatal {
                        warn!("Raising abort, sink stops consuming");
                        self.supervision.abort.trigger();
                        break;
                    }
                }
            }
        }

        // Cleanup
        if let Err(e) = sink.flush().await {
            error!(error = %e, "Flush failed on shutdown");
        }
        if let Err(e) = sink.close().await {
            error!(error = %e, "Close failed on shutdown");
        }

        debug!(failures = failures.len(), "Sink worker stopped");
        failures
    }
}
