//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the ignition runtime
///
/// The core container and lifecycle APIs never return this - unresolved keys
/// and duplicate registrations degrade to sentinels per the runtime's
/// first-wins / not-found policy. Providers use it for their own failures
/// (configuration reads, logger setup, argument parsing).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration loading or parsing error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
    },

    /// Provider lifecycle error
    #[error("Provider error: {message}")]
    Provider {
        /// Description of the provider error
        message: String,
    },

    /// Generic string-based error
    #[error("String error: {0}")]
    String(String),
}

impl Error {
    /// Create a configuration error with the given message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a provider error with the given message
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}
