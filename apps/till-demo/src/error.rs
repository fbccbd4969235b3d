//! # Demo Error Types

use thiserror::Error;
use till_core::CoreError;

/// Result type alias for the demo driver.
pub type DemoResult<T> = Result<T, DemoError>;

/// Everything that can stop the demo.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// An environment override had an unusable value.
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    /// A checkout operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<std::io::Error> for DemoError {
    fn from(err: std::io::Error) -> Self {
        DemoError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for DemoError {
    fn from(err: toml::de::Error) -> Self {
        DemoError::ConfigLoadFailed(err.to_string())
    }
}
