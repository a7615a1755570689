//! Error types for the routing engine

use crate::types::CapabilityTag;
use thiserror::Error;

/// Result type alias for routing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the routing engine
#[derive(Debug, Error)]
pub enum Error {
    /// A specialist reported a failure
    #[error("Specialist error: {tag}: {message}")]
    Specialist {
        /// Capability of the failing specialist
        tag: CapabilityTag,
        /// What went wrong
        message: String,
    },

    /// A specialist call did not finish in time
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A tag has no entry in the specialist registry
    #[error("No registry entry for capability: {0}")]
    UnknownCapability(CapabilityTag),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a specialist error
    pub fn specialist(tag: CapabilityTag, message: impl Into<String>) -> Self {
        Self::Specialist {
            tag,
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an other error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Whether the error was caused by the caller's input rather than an internal fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(format!("Failed to parse YAML: {}", err))
    }
}
