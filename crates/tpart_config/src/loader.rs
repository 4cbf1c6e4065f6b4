//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::RefineConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "tpart.toml";

/// Loads and validates a `tpart.toml` configuration from a project directory.
///
/// Reads `<project_dir>/tpart.toml`, parses it, and validates its values.
pub fn load_config(project_dir: &Path) -> Result<RefineConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE_NAME);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `tpart.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<RefineConfig, ConfigError> {
    let config: RefineConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates configuration values that do not depend on a particular graph.
///
/// Dimension checks against a hypergraph happen when the evaluator is built.
pub fn validate_config(config: &RefineConfig) -> Result<(), ConfigError> {
    if config.partition.num_parts < 2 {
        return Err(ConfigError::ValidationError(format!(
            "partition.num_parts must be at least 2, got {}",
            config.partition.num_parts
        )));
    }
    if config.partition.ub_factor < 0.0 {
        return Err(invalid("partition.ub_factor must not be negative"));
    }
    if config.weights.hyperedge.is_empty() {
        return Err(invalid("weights.hyperedge must not be empty"));
    }
    let mut factors = config
        .weights
        .hyperedge
        .iter()
        .chain(&config.weights.vertex)
        .chain(&config.weights.placement);
    if factors.any(|f| *f < 0.0 || !f.is_finite()) {
        return Err(invalid("weight factors must be finite and non-negative"));
    }

    let timing = &config.timing;
    let timing_factors = [
        ("timing.net_factor", timing.net_factor),
        ("timing.path_factor", timing.path_factor),
        ("timing.snaking_factor", timing.snaking_factor),
        ("timing.extra_cut_delay", timing.extra_cut_delay),
    ];
    for (name, value) in timing_factors {
        if value < 0.0 || !value.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be finite and non-negative, got {value}"
            )));
        }
    }
    if timing.exp_factor <= 0.0 || !timing.exp_factor.is_finite() {
        return Err(invalid("timing.exp_factor must be positive"));
    }

    if config.refine.max_passes == 0 {
        return Err(invalid("refine.max_passes must be at least 1"));
    }
    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
