//! Configuration error types
//!
//! Every variant carries enough context to fix the document without reading
//! the loader source: the dotted key that failed and a `→` hint.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for loading and validating experiment configurations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or validating an experiment configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}\n  → Check the path passed on the command line")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {message}\n  → Check indentation and quoting near the reported line")]
    Parse { message: String },

    #[error("Missing required field '{field}'\n  → Add `{field}` to the configuration")]
    MissingField { field: String },

    #[error("Inconsistent scale at '{field}': top-level scale is x{expected} but found x{found}\n  → Use the same upscaling factor in every section")]
    InconsistentScale {
        field: String,
        expected: u32,
        found: u32,
    },

    #[error("Path for '{field}' does not exist: {path}\n  → Prepare the dataset or fix the path (relative paths resolve against the run root)")]
    UnresolvedPath { field: String, path: PathBuf },

    #[error("Unknown {kind} type '{tag}' at '{field}'\n  → Registered {kind} types: {known}")]
    UnknownType {
        kind: &'static str,
        field: String,
        tag: String,
        known: String,
    },

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid override '{input}': {message}\n  → Overrides look like `train:optim_g:lr=2e-4`")]
    InvalidOverride { input: String, message: String },
}

impl ConfigError {
    /// Shorthand for a missing dotted key.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    /// Shorthand for an out-of-range or malformed value.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "E001",
            Self::Parse { .. } => "E002",
            Self::MissingField { .. } => "E003",
            Self::InconsistentScale { .. } => "E004",
            Self::UnresolvedPath { .. } => "E005",
            Self::UnknownType { .. } => "E006",
            Self::InvalidValue { .. } => "E007",
            Self::InvalidOverride { .. } => "E008",
        }
    }

    /// The dotted key the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field }
            | Self::InconsistentScale { field, .. }
            | Self::UnresolvedPath { field, .. }
            | Self::UnknownType { field, .. }
            | Self::InvalidValue { field, .. } => Some(field),
            Self::Read { .. } | Self::Parse { .. } | Self::InvalidOverride { .. } => None,
        }
    }
}
