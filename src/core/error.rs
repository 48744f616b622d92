/// Influxcli Error Module
///
/// This module defines the error type shared by the influxcli library and binary.
use thiserror::Error;

/// Error type for the influxcli application.
///
/// Classification and timestamp formatting never fail; errors only come from:
/// - Writing to the output sink
/// - Parsing result payloads and configuration files
/// - Executing shell commands and queries
#[derive(Error, Debug)]
pub enum InfluxcliError {
    /// File system and output sink I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing errors for result payloads
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Result payloads that parse as JSON but do not have the series shape
    #[error("Result error: {0}")]
    Result(String),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Query execution errors reported by the executor
    #[error("Query error: {0}")]
    Query(String),

    /// Shell command validation errors
    #[error("Command error: {0}")]
    Command(String),
}

/// Type alias for Result to use InfluxcliError as the error type.
pub type Result<T> = std::result::Result<T, InfluxcliError>;
