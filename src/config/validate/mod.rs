//! Configuration validation
//!
//! Validates experiment configurations against the driver contract before
//! any run starts.

mod context;
mod error;
mod scale;
mod validator;

#[cfg(test)]
mod proptests;

pub use context::ValidationContext;
pub use error::{ConfigError, ConfigResult};
pub use scale::marker_in_name;
pub use validator::validate_config;
