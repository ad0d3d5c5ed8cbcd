//! Export command implementation.

use anyhow::{Context, Result};
use clap::CommandFactory;
use tracing::info;

use config_loader::ConfigLoader;
use contracts::{FailurePolicy, RunPlan, SinkConfig, SinkType, PARAM_PRETTY};

use crate::cli::Cli;
use crate::error::CliError;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute an export run as described by the command line
pub async fn run_export(cli: &Cli) -> Result<()> {
    let plan = build_plan(cli).context("Invalid run plan")?;

    if !plan.has_sinks() {
        print_usage()?;
        return Ok(());
    }

    info!(
        dir = plan.input_dir.as_deref().unwrap_or("<unset>"),
        output_root = %plan.output_root.display(),
        sinks = plan.sinks.len(),
        policy = ?plan.failure_policy,
        "Run plan ready"
    );

    if let Some(port) = cli.metrics_port() {
        observability::init_metrics_only(port)?;
    }

    let mut config = PipelineConfig::new(plan);
    if let Some(capacity) = cli.queue_capacity {
        config.input_capacity = capacity;
    }

    let stats = Pipeline::new(config)
        .run()
        .await
        .context("Export failed")?;

    stats.print_summary();

    if !stats.is_clean() {
        return Err(CliError::FailuresRecorded {
            count: stats.failure_count(),
        }
        .into());
    }

    Ok(())
}

/// Merge the optional run plan file with command line flags
///
/// Flags win over file values. `--json` / `--link` add a default sink of
/// that type unless the file already declares one.
pub fn build_plan(cli: &Cli) -> Result<RunPlan, CliError> {
    let mut plan = match &cli.config {
        Some(path) => {
            info!(config = %path.display(), "Loading run plan");
            ConfigLoader::load_from_path(path)?
        }
        None => RunPlan::default(),
    };

    if let Some(dir) = &cli.dir {
        plan.input_dir = Some(dir.clone());
    }
    if let Some(out) = &cli.out {
        plan.output_root = out.clone();
    }
    if cli.keep_going {
        plan.failure_policy = FailurePolicy::Continue;
    }

    if cli.json && !plan.has_sink_type(SinkType::Json) {
        plan.sinks.push(SinkConfig::json());
    }
    if cli.link && !plan.has_sink_type(SinkType::Links) {
        plan.sinks.push(SinkConfig::links());
    }

    for sink in &mut plan.sinks {
        if let Some(capacity) = cli.queue_capacity {
            sink.queue_capacity = capacity;
        }
        if cli.pretty && sink.sink_type == SinkType::Json {
            sink.params.insert(PARAM_PRETTY.to_string(), "true".to_string());
        }
    }

    ConfigLoader::validate(&plan)?;
    Ok(plan)
}

fn print_usage() -> Result<()> {
    println!("No output selected. Pass --json and/or --link to export something.\n");
    Cli::command()
        .print_help()
        .context("Failed to print usage")?;
    println!();
    Ok(())
}
