//! Completion command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{Cli, CompletionArgs, ShellType};
use clap::CommandFactory;
use clap_complete::{generate, Shell};

pub fn run_completion(args: CompletionArgs, level: LogLevel) -> crate::Result<()> {
    log(
        level,
        LogLevel::Verbose,
        &format!("Generating completions for: {}", args.shell),
    );

    let mut cmd = Cli::command();
    generate(Shell::from(args.shell), &mut cmd, "lamnet", &mut std::io::stdout());
    Ok(())
}
