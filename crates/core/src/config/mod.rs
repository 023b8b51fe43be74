//! Configuration loading and validation.

mod loader;
mod types;
mod validate;

use thiserror::Error;

pub use loader::{load_config, load_config_from_str};
pub use types::{AlbumSettings, Config};
pub use validate::validate_config;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("config file not found: {0}")]
    FileNotFound(String),

    /// The config file could not be parsed.
    #[error("failed to parse config: {0}")]
    ParseError(String),

    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}
