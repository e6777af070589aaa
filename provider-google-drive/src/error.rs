//! Error types for the Google Drive provider

use thiserror::Error;

/// Google Drive provider errors
#[derive(Error, Debug)]
pub enum GoogleDriveError {
    /// API request returned an error
    #[error("Google Drive API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse an API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The file exists but has no byte size (e.g. a folder or a
    /// Google-native document)
    #[error("File {file_id} has no content size")]
    NotDownloadable { file_id: String },

    /// Transport error
    #[error(transparent)]
    Transport(#[from] transport_traits::error::TransportError),
}

/// Result type for Google Drive operations
pub type Result<T> = std::result::Result<T, GoogleDriveError>;

impl From<GoogleDriveError> for transport_traits::error::TransportError {
    fn from(error: GoogleDriveError) -> Self {
        match error {
            GoogleDriveError::ApiError {
                status_code,
                message,
            } => transport_traits::error::TransportError::Status {
                status: status_code,
                detail: message,
            },
            GoogleDriveError::Transport(e) => e,
            other => transport_traits::error::TransportError::OperationFailed(other.to_string()),
        }
    }
}
