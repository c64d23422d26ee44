//! Init command types

use clap::Parser;
use std::path::PathBuf;

/// Arguments for the init command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InitArgs {
    /// Template to use for initialization
    #[arg(short, long, default_value = "train")]
    pub template: InitTemplate,

    /// Upscaling factor
    #[arg(long, default_value = "4")]
    pub scale: u32,

    /// Experiment name (derived from template and scale if not specified)
    #[arg(long)]
    pub name: Option<String>,

    /// Output path (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Init template type
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InitTemplate {
    /// DF2K training run with Set5 validation
    #[default]
    Train,
    /// Benchmark evaluation of a pretrained model
    Test,
}

impl std::str::FromStr for InitTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "train" => Ok(InitTemplate::Train),
            "test" | "eval" => Ok(InitTemplate::Test),
            _ => Err(format!("Unknown template: {s}. Valid templates: train, test")),
        }
    }
}

impl std::fmt::Display for InitTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitTemplate::Train => write!(f, "train"),
            InitTemplate::Test => write!(f, "test"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_template_from_str() {
        assert_eq!("train".parse::<InitTemplate>().unwrap(), InitTemplate::Train);
        assert_eq!("TEST".parse::<InitTemplate>().unwrap(), InitTemplate::Test);
        assert_eq!("eval".parse::<InitTemplate>().unwrap(), InitTemplate::Test);
        assert!("lora".parse::<InitTemplate>().is_err());
    }

    #[test]
    fn test_init_template_display() {
        assert_eq!(format!("{}", InitTemplate::Train), "train");
        assert_eq!(format!("{}", InitTemplate::Test), "test");
    }

    #[test]
    fn test_init_template_default() {
        assert_eq!(InitTemplate::default(), InitTemplate::Train);
    }
}
