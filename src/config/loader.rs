//! Loading experiment configurations from YAML
//!
//! ```no_run
//! use lamnet::config::{load_experiment, ValidationContext};
//!
//! let ctx = ValidationContext::new(".");
//! let loaded = load_experiment("options/train/train_LAMNet_x4.yml", &ctx, &[])?;
//! println!("{} parameters", loaded.plan.network.parameters);
//! # Ok::<(), lamnet::config::ConfigError>(())
//! ```

use super::layout::{apply_debug_overrides, ExperimentLayout};
use super::overrides::{apply_overrides, Override};
use super::plan::{ExperimentPlan, RunMode};
use super::registry::Registries;
use super::schema::ExperimentConfig;
use super::validate::{validate_config, ConfigError, ConfigResult, ValidationContext};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// A validated configuration with everything derived from it
#[derive(Debug)]
pub struct LoadedExperiment {
    pub config: ExperimentConfig,
    pub plan: ExperimentPlan,
    pub layout: ExperimentLayout,
}

/// Parse YAML text into the typed model without validating it.
pub fn parse_config(text: &str) -> ConfigResult<ExperimentConfig> {
    parse_config_with_overrides(text, &[])
}

/// Parse YAML text, applying `overrides` to the raw document first.
pub fn parse_config_with_overrides(
    text: &str,
    overrides: &[Override],
) -> ConfigResult<ExperimentConfig> {
    let mut doc: Value = serde_yaml::from_str(text).map_err(parse_error)?;
    if doc.is_null() {
        doc = Value::Mapping(Mapping::new());
    }
    if !doc.is_mapping() {
        return Err(ConfigError::Parse {
            message: "top level of an experiment file must be a mapping".to_string(),
        });
    }
    apply_overrides(&mut doc, overrides)?;
    serde_yaml::from_value(doc).map_err(parse_error)
}

/// Read, parse and validate a configuration file with the built-in handlers.
pub fn load_config<P: AsRef<Path>>(
    path: P,
    ctx: &ValidationContext,
) -> ConfigResult<ExperimentConfig> {
    load_experiment(path, ctx, &[]).map(|loaded| loaded.config)
}

/// Read, parse, override and validate a configuration file.
///
/// Debug training runs (a name containing `debug`) get shortened intervals
/// before validation. The file itself is never written.
pub fn load_experiment<P: AsRef<Path>>(
    path: P,
    ctx: &ValidationContext,
    overrides: &[Override],
) -> ConfigResult<LoadedExperiment> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), overrides = overrides.len(), "loading experiment");

    let mut config = parse_config_with_overrides(&text, overrides)?;
    let mode = ctx.mode.unwrap_or_else(|| RunMode::infer(&config));
    apply_debug_overrides(&mut config, mode);

    let ctx = ctx.clone().with_mode(mode);
    let plan = validate_config(&config, &ctx, &Registries::builtin())?;
    let layout = ExperimentLayout::resolve(&config, &ctx.root, mode);
    tracing::info!(name = %config.name, %mode, "experiment is valid");

    Ok(LoadedExperiment {
        config,
        plan,
        layout,
    })
}

/// Serialize a configuration back to YAML.
pub fn to_yaml(config: &ExperimentConfig) -> crate::Result<String> {
    serde_yaml::to_string(config).map_err(crate::Error::serialization)
}

fn parse_error(err: serde_yaml::Error) -> ConfigError {
    ConfigError::Parse {
        message: err.to_string(),
    }
}
