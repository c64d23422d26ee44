//! CLI command implementations

mod completion;
mod info;
mod init;
mod schedule;
mod validate;


use crate::cli::LogLevel;
use crate::config::{Cli, Command};

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> crate::Result<()> {
    let log_level = LogLevel::from_flags(cli.verbose, cli.quiet);

    match cli.command {
        Command::Validate(args) => validate::run_validate(args, log_level),
        Command::Info(args) => info::run_info(args, log_level),
        Command::Init(args) => init::run_init(args, log_level),
        Command::Schedule(args) => schedule::run_schedule(args, log_level),
        Command::Completion(args) => completion::run_completion(args, log_level),
    }
}
