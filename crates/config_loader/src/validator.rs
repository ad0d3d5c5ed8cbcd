//! Run plan validation
//!
//! Rules:
//! - sink names are non-empty and unique
//! - no two sinks write into the same output directory
//! - queue_capacity > 0
//! - only known params per sink type, with well-formed values

use std::collections::HashSet;
use std::path::{Component, Path};

use contracts::{ContractError, RunPlan, SinkConfig, PARAM_DIR, PARAM_LINK_PREFIX, PARAM_PRETTY};

/// Validate a RunPlan
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(plan: &RunPlan) -> Result<(), ContractError> {
    validate_sink_names(plan)?;
    validate_sink_dirs(plan)?;
    for (idx, sink) in plan.sinks.iter().enumerate() {
        validate_queue_capacity(idx, sink)?;
        validate_params(idx, sink)?;
    }
    Ok(())
}

fn validate_sink_names(plan: &RunPlan) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, sink) in plan.sinks.iter().enumerate() {
        if sink.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("sinks[{}].name", idx),
                "sink name cannot be empty",
            ));
        }
        if !seen.insert(sink.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}]", sink.name),
                "duplicate sink name",
            ));
        }
    }
    Ok(())
}

/// Each sink owns its directory exclusively
fn validate_sink_dirs(plan: &RunPlan) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for sink in &plan.sinks {
        if !seen.insert(sink.dir_name()) {
            return Err(ContractError::config_validation(
                format!("sinks[name={}].params.{}", sink.name, PARAM_DIR),
                format!("output directory '{}' is already used by another sink", sink.dir_name()),
            ));
        }
    }
    Ok(())
}

fn validate_queue_capacity(idx: usize, sink: &SinkConfig) -> Result<(), ContractError> {
    if sink.queue_capacity == 0 {
        return Err(ContractError::config_validation(
            format!("sinks[{}].queue_capacity", idx),
            "queue_capacity must be > 0",
        ));
    }
    Ok(())
}

fn validate_params(idx: usize, sink: &SinkConfig) -> Result<(), ContractError> {
    let known = sink.sink_type.known_params();
    for (key, value) in &sink.params {
        let field = format!("sinks[{}].params.{}", idx, key);
        if !known.contains(&key.as_str()) {
            return Err(ContractError::config_validation(
                field,
                format!("unknown parameter for {:?} sink", sink.sink_type),
            ));
        }
        match key.as_str() {
            PARAM_DIR => validate_dir_param(field, value)?,
            PARAM_PRETTY if value.parse::<bool>().is_err() => {
                return Err(ContractError::config_validation(
                    field,
                    format!("expected 'true' or 'false', got '{}'", value),
                ));
            }
            PARAM_LINK_PREFIX if value.is_empty() => {
                return Err(ContractError::config_validation(field, "link_prefix cannot be empty"));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Output directories are a single plain component under the output root
fn validate_dir_param(field: String, value: &str) -> Result<(), ContractError> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ContractError::config_validation(
            field,
            format!("'{}' must be a single directory name", value),
        )),
    }
}
