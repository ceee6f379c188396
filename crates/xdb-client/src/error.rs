//! Client error types.

use std::path::PathBuf;

use thiserror::Error;
use xdb_config::ConfigError;

/// Errors raised by the XDB client and its helpers.
///
/// `KeyLoad` and `Signing` never escape the client: a key that cannot be
/// loaded or used degrades to unsigned requests. They exist so the signer can
/// report what went wrong before logging it.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Could not load private key: {0}")]
    KeyLoad(String),

    #[error("Error creating signature: {0}")]
    Signing(String),

    #[error("Request failed: {0}")]
    Api(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Error reading file {}: {message}", path.display())]
    FileAccess { path: PathBuf, message: String },

    #[error("Invalid transcript: {0}")]
    InvalidTranscript(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),
}

impl ClientError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::FileAccess {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
