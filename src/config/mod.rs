//! Declarative experiment configuration
//!
//! A LAMNet experiment is one YAML document consumed by the BasicSR
//! train/test drivers. This module parses it, applies command-line
//! overrides, validates it against the driver contract and derives the run
//! layout.

mod cli;
pub mod layout;
mod loader;
pub mod overrides;
pub mod plan;
pub mod registry;
mod schema;
mod validate;

pub use cli::{
    parse_args, Cli, Command, CompletionArgs, InfoArgs, InitArgs, InitTemplate, LoadArgs,
    OutputFormat, ScheduleArgs, ShellType, ValidateArgs,
};
pub use layout::{apply_debug_overrides, ExperimentLayout};
pub use loader::{
    load_config, load_experiment, parse_config, parse_config_with_overrides, to_yaml,
    LoadedExperiment,
};
pub use overrides::{apply_overrides, Override};
pub use plan::{ExperimentPlan, RunMode};
pub use registry::{Registries, Registry};
pub use schema::{
    DatasetSpec, DistParams, ExperimentConfig, GpuCount, IoBackend, LoggerSpec, LossSpec,
    MetricSpec, NetworkSpec, OptimizerSpec, PathSpec, Phase, Reduction, SchedulerSpec,
    TrainSection, ValSection, WandbSpec,
};
pub use validate::{marker_in_name, validate_config, ConfigError, ConfigResult, ValidationContext};
