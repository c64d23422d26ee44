//! Value types for `info --format` and `completion <SHELL>`

use crate::Error;
use clap_complete::Shell;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How `info` prints a loaded experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    const NAMES: [(&'static str, OutputFormat); 4] = [
        ("text", OutputFormat::Text),
        ("json", OutputFormat::Json),
        ("yaml", OutputFormat::Yaml),
        ("yml", OutputFormat::Yaml),
    ];

    /// Serialize `value` for the structured formats; `None` for text.
    pub fn render<T: Serialize>(self, value: &T) -> crate::Result<Option<String>> {
        match self {
            OutputFormat::Text => Ok(None),
            OutputFormat::Json => serde_json::to_string_pretty(value)
                .map(Some)
                .map_err(Error::serialization),
            OutputFormat::Yaml => serde_yaml::to_string(value)
                .map(Some)
                .map_err(Error::serialization),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_ascii_lowercase();
        Self::NAMES
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|&(_, format)| format)
            .ok_or_else(|| format!("Unknown output format '{s}' (expected text, json or yaml)"))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        };
        f.write_str(name)
    }
}

/// Shell to generate completions for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl From<ShellType> for Shell {
    fn from(shell: ShellType) -> Self {
        match shell {
            ShellType::Bash => Shell::Bash,
            ShellType::Zsh => Shell::Zsh,
            ShellType::Fish => Shell::Fish,
            ShellType::PowerShell => Shell::PowerShell,
        }
    }
}

impl FromStr for ShellType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bash" => Ok(ShellType::Bash),
            "zsh" => Ok(ShellType::Zsh),
            "fish" => Ok(ShellType::Fish),
            "powershell" | "pwsh" | "ps" => Ok(ShellType::PowerShell),
            _ => Err(format!(
                "Unknown shell '{s}' (expected bash, zsh, fish or powershell)"
            )),
        }
    }
}

impl fmt::Display for ShellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Shell::from(*self), f)
    }
}
