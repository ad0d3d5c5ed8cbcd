//! Pipeline orchestrator - coordinates discovery, production and fan-out.

use std::path::PathBuf;
use std::time::Instant;

use contracts::{default_queue_capacity, ContractError, FailurePolicy, RunPlan, SharedBatch};
use dispatcher::{create_dispatcher, DispatcherError, Supervision};
use ingestion::{discover, parse_file, validate_root_with, PathRule};
use observability::RunAggregator;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn, Span};

use super::state::{PipelineState, StateMachine};
use super::stats::{FileFailure, RunStats};
use crate::error::{CliError, Result};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validated run plan
    pub plan: RunPlan,

    /// Capacity of the producer -> dispatcher queue
    pub input_capacity: usize,

    /// Shape accepted for the input directory
    pub path_rule: PathRule,
}

impl PipelineConfig {
    pub fn new(plan: RunPlan) -> Self {
        Self {
            plan,
            input_capacity: default_queue_capacity(),
            path_rule: PathRule::native(),
        }
    }
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run the export to completion
    ///
    /// Under `FailurePolicy::Abort` an error is returned once every sink has
    /// stopped: a fatal parse error if there was one, otherwise the first
    /// failure of the first failing sink in configuration order. Under
    /// `FailurePolicy::Continue` only run level errors are returned, file and
    /// sink failures end up in the stats.
    #[instrument(
        name = "pipeline_run",
        skip(self),
        fields(
            sinks = self.config.plan.sinks.len(),
            policy = ?self.config.plan.failure_policy
        )
    )]
    pub async fn run(self) -> Result<RunStats> {
        let start_time = Instant::now();
        let plan = self.config.plan;
        let mut machine = StateMachine::new();

        if !plan.has_sinks() {
            info!("No sinks active, nothing to do");
            return Ok(RunStats::default());
        }

        // Discovery
        machine.advance(PipelineState::Discovering)?;
        let dir = plan.input_dir.as_deref().unwrap_or_default();
        let root = validate_root_with(dir, self.config.path_rule)?;
        let discovery = discover(&root)?;

        let mut aggregator = RunAggregator::new();
        aggregator.observe_discovery(discovery.entries().len(), discovery.skipped_count());
        let files: Vec<String> = discovery.candidates().map(|e| e.name.clone()).collect();

        // Fan-out
        machine.advance(PipelineState::Draining)?;
        let supervision = Supervision::new(plan.failure_policy);
        let (batch_tx, batch_rx) = mpsc::channel::<SharedBatch>(self.config.input_capacity.max(1));
        let dispatcher = create_dispatcher(
            plan.sinks.clone(),
            plan.output_root.clone(),
            supervision.clone(),
            batch_rx,
        )?;
        let dispatcher_handle = dispatcher.spawn();

        info!(
            root = %root.display(),
            files = files.len(),
            output_root = %plan.output_root.display(),
            "Export started"
        );

        let producer = Producer {
            root,
            files,
            supervision: supervision.clone(),
            aggregator,
        };
        let span = Span::current();
        let outcome = tokio::task::spawn_blocking(move || {
            let _guard = span.enter();
            producer.run(batch_tx)
        })
        .await
        .map_err(|e| CliError::producer(e.to_string()))?;

        // Shutdown
        machine.advance(PipelineState::ShuttingDown)?;
        let results = dispatcher_handle
            .await
            .map_err(|e| DispatcherError::WorkerPanicked {
                name: "dispatcher".to_string(),
                message: e.to_string(),
            })?;
        let mut sinks = Vec::with_capacity(results.len());
        for result in results {
            sinks.push(result?);
        }
        machine.advance(PipelineState::Done)?;

        let duration = start_time.elapsed();
        observability::record_run_duration(duration);

        if let Some(err) = outcome.fatal {
            return Err(err.into());
        }

        if plan.failure_policy == FailurePolicy::Abort {
            if let Some(report) = sinks.iter_mut().find(|s| !s.is_clean()) {
                let failure = report.failures.swap_remove(0);
                return Err(failure.error.into());
            }
        }

        let stats = RunStats {
            run: outcome.aggregator.summary(),
            sinks,
            file_failures: outcome.failures,
            duration,
        };

        info!(
            files = stats.run.files_parsed,
            records = stats.run.total_records,
            batches_written = stats.batches_written(),
            failures = stats.failure_count(),
            duration_secs = stats.duration.as_secs_f64(),
            "Export finished"
        );

        Ok(stats)
    }
}

/// Production task state, runs on the blocking pool
struct Producer {
    root: PathBuf,
    files: Vec<String>,
    supervision: Supervision,
    aggregator: RunAggregator,
}

struct ProducerOutcome {
    aggregator: RunAggregator,
    failures: Vec<FileFailure>,
    fatal: Option<ContractError>,
}

impl Producer {
    /// Parse files in discovery order and push each batch to the dispatcher
    ///
    /// Dropping `tx` on return closes the dispatcher input.
    fn run(mut self, tx: mpsc::Sender<SharedBatch>) -> ProducerOutcome {
        let mut failures = Vec::new();
        let mut fatal = None;

        for file in &self.files {
            if self.supervision.abort.is_triggered() {
                warn!("Abort raised, not starting further files");
                break;
            }

            let started = Instant::now();
            match parse_file(&self.root, file) {
                Ok(batch) => {
                    let parse_ms = started.elapsed().as_secs_f64() * 1000.0;
                    self.aggregator.observe_parsed(batch.len(), parse_ms);
                    debug!(file = %file, records = batch.len(), "Batch produced");

                    if tx.blocking_send(batch.into_shared()).is_err() {
                        warn!("Dispatcher input closed");
                        break;
                    }
                }
                Err(e) => {
                    self.aggregator.observe_failed();
                    if self.supervision.is_fatal(&e) {
                        error!(file = %file, error = %e, "Parse failed, aborting run");
                        self.supervision.abort.trigger();
                        fatal = Some(e);
                        break;
                    }
                    warn!(file = %file, error = %e, "Parse failed, skipping file");
                    failures.push(FileFailure {
                        file: file.clone(),
                        error: e,
                    });
                }
            }
        }

        ProducerOutcome {
            aggregator: self.aggregator,
            failures,
            fatal,
        }
    }
}
