//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! lamnet validate options/train/train_LAMNet_x4.yml
//! lamnet validate options/test/test_LAMNet_x3.yml --root /data/lamnet --detailed
//! lamnet info options/train/train_LAMNet_x4.yml --format json --no-path-check
//! lamnet init --template test --scale 3 --output options/test/test_x3.yml
//! lamnet schedule options/train/train_LAMNet_x4.yml --force train:warmup_iter=5000
//! ```

mod core;
mod init;
mod types;

pub use core::{
    parse_args, Cli, Command, CompletionArgs, InfoArgs, LoadArgs, ScheduleArgs, ValidateArgs,
};
pub use init::{InitArgs, InitTemplate};
pub use types::{OutputFormat, ShellType};
