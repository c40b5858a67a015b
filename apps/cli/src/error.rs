//! CLI error type.

use thiserror::Error;
use vitrine_client::ClientError;
use vitrine_core::ValidationError;

/// Errors that end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// A store, session, or config operation failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Reading stdin or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be serialized.
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A command-line value could not be understood.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The config file already exists and `--force` was not given.
    #[error("Config file already exists at {0} (use --force to overwrite)")]
    ConfigExists(String),
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Client(err.into())
    }
}

pub type CliResult<T> = Result<T, CliError>;
