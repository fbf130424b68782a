/*!
 * Error types for the polytrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur during a single call to the external translator
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The translator process could not be started
    #[error("Failed to start translator '{command}': {message}")]
    Spawn {
        /// Command that was executed
        command: String,
        /// Underlying OS error
        message: String,
    },

    /// The translator exited with a non-zero status
    #[error("Translator exited with status {status}: {stderr}")]
    CommandFailed {
        /// Exit code, -1 when terminated by a signal
        status: i32,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// The translator succeeded but produced no text
    #[error("Translator returned an empty response")]
    EmptyResponse,

    /// The attempt exceeded its time budget
    #[error("Translation attempt timed out after {0}s")]
    Timeout(u64),

    /// I/O error while talking to the translator
    #[error("Translator I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The translator is not installed or not reachable
    #[error("Translator unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur while persisting the translation cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// File system error
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The in-memory cache could not be serialized
    #[error("Cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The temporary file could not replace the cache file
    #[error("Failed to persist cache file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Errors raised while validating the configuration
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A numeric setting is out of range
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A required setting is empty
    #[error("Missing value for '{0}'")]
    Missing(&'static str),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the translator
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the cache
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Error from the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
