//! Core CLI types - Cli, Command, and argument structs

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use super::init::InitArgs;
use super::types::{OutputFormat, ShellType};
use crate::config::{Override, RunMode, ValidationContext};

/// LAMNet experiment configuration toolkit
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "lamnet")]
#[command(version)]
#[command(about = "Validate and inspect LAMNet super-resolution experiment configurations")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Validate an experiment configuration
    Validate(ValidateArgs),

    /// Display information about a configuration
    Info(InfoArgs),

    /// Write a starter experiment configuration
    Init(InitArgs),

    /// Print the learning rate curve of a training configuration
    Schedule(ScheduleArgs),

    /// Generate shell completions
    Completion(CompletionArgs),
}

/// Options shared by every command that loads a configuration
#[derive(Args, Debug, Clone, PartialEq)]
pub struct LoadArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Run mode (train, test); inferred from the `train` section if omitted
    #[arg(long)]
    pub mode: Option<RunMode>,

    /// Directory relative dataset and checkpoint paths resolve against
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Skip checking that dataset roots and checkpoints exist
    #[arg(long)]
    pub no_path_check: bool,

    /// Override a key, e.g. `--force train:optim_g:lr=2e-4` (repeatable)
    #[arg(long = "force", value_name = "KEY=VAL")]
    pub overrides: Vec<Override>,
}

impl LoadArgs {
    /// Validation context described by the flags.
    pub fn context(&self) -> ValidationContext {
        let ctx = ValidationContext::new(&self.root).with_path_checks(!self.no_path_check);
        match self.mode {
            Some(mode) => ctx.with_mode(mode),
            None => ctx,
        }
    }
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    /// Show detailed validation report
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the schedule command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    /// Evenly spaced sample points between 0 and total_iter
    #[arg(long, default_value = "11")]
    pub points: u64,
}

/// Arguments for completion command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct CompletionArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: ShellType,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}
