//! Lamnet CLI
//!
//! Validation and inspection of LAMNet experiment configurations.
//!
//! # Usage
//!
//! ```bash
//! # Validate a training config against the datasets under the current directory
//! lamnet validate options/train/train_LAMNet_x4.yml
//!
//! # Validate with overrides, without touching the filesystem
//! lamnet validate options/train/train_LAMNet_x4.yml --no-path-check --force train:total_iter=1000
//!
//! # Show config info
//! lamnet info options/test/test_LAMNet_x3.yml --format json
//!
//! # Print the learning rate curve
//! lamnet schedule options/train/train_LAMNet_x4.yml --points 21
//! ```

use clap::Parser;
use lamnet::cli::{init_tracing, run_command, Cli, LogLevel};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(LogLevel::from_flags(cli.verbose, cli.quiet));

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error [{}]: {e}", e.code());
            ExitCode::FAILURE
        }
    }
}
