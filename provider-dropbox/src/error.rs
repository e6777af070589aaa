//! Error types for the Dropbox provider

use thiserror::Error;

/// Dropbox provider errors
#[derive(Error, Debug)]
pub enum DropboxError {
    /// API request returned an error
    #[error("Dropbox API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse an API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The path resolved to something other than a file
    #[error("{path} is not a file (metadata tag {tag})")]
    NotAFile { path: String, tag: String },

    /// Transport error
    #[error(transparent)]
    Transport(#[from] transport_traits::error::TransportError),
}

/// Result type for Dropbox operations
pub type Result<T> = std::result::Result<T, DropboxError>;

impl From<DropboxError> for transport_traits::error::TransportError {
    fn from(error: DropboxError) -> Self {
        match error {
            DropboxError::ApiError {
                status_code,
                message,
            } => transport_traits::error::TransportError::Status {
                status: status_code,
                detail: message,
            },
            DropboxError::Transport(e) => e,
            other => transport_traits::error::TransportError::OperationFailed(other.to_string()),
        }
    }
}
