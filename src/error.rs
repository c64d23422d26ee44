//! Crate-level error type
//!
//! Configuration problems keep their own codes; I/O outside the loader and
//! serialization failures get theirs.

use crate::config::ConfigError;
use thiserror::Error;

/// Result type alias for lamnet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the library and the `lamnet` binary.
#[derive(Error, Debug)]
pub enum Error {
    /// The experiment configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn serialization(err: impl std::fmt::Display) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(err) => err.code(),
            Self::Io { .. } => "E050",
            Self::Serialization { .. } => "E051",
        }
    }
}
