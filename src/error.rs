//! Error types for the coursesync application.
//!
//! Uses `thiserror` for structured error definitions that provide
//! clear context about what went wrong.

use thiserror::Error;

/// Error type for course platform API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server returned a non-success status
    #[error("HTTP {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Response body didn't match the expected shape
    #[error("Malformed upstream response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    /// URL building or resolution failed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Missing required configuration value
    #[error("Missing required config value: {0}")]
    MissingValue(String),

    /// Invalid configuration value
    #[error("Invalid config value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory not found
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Error type for translation operations.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// HTTP request to API failed
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error: {0}")]
    ApiError(String),

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Model returned an empty or refused translation
    #[error("Translation refused: {0}")]
    Refused(String),

    /// All retry attempts exhausted
    #[error("All retries exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

/// Error type for persisted structure documents.
#[derive(Error, Debug)]
pub enum StructureError {
    /// Failed to read or write the document
    #[error("Structure file I/O failed: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to serialize the structure to YAML
    #[error("Failed to serialize structure: {0}")]
    SerializeError(#[from] serde_yaml::Error),
}

/// Result type alias using anyhow for application-level error handling.
pub type Result<T> = anyhow::Result<T>;
