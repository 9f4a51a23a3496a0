//! Error types for the engine and its configuration layer.

use thiserror::Error;

/// Raised when an American odds line falls in the undefined band `[-100, +100)`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("american odds must be >= +100 or < -100, got {odds}")]
pub struct InvalidOddsError {
    pub odds: i32,
}

/// Calculator defaults that could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse defaults: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
