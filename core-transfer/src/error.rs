use thiserror::Error;
use transport_traits::error::TransportError;

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("upload already in progress")]
    AlreadyInProgress,

    #[error("no upload in progress")]
    NotInProgress,

    #[error("content is empty")]
    EmptyContent,

    #[error("bound source {bound} does not match persisted session source {persisted}")]
    SourceMismatch { bound: String, persisted: String },

    #[error("failed to initiate upload (status {status}): {detail}")]
    InitiateRejected { status: u16, detail: String },

    #[error("upload permanently rejected (status {status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("initiation response carried no session URL")]
    MissingSessionUrl,

    #[error("invalid Range header: {0}")]
    InvalidRangeHeader(String),

    #[error("transfer ended without a completion acknowledgement")]
    MissingCompletion,

    #[error("transfer cancelled")]
    Cancelled,

    #[error("decoding published resource: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("session state store: {0}")]
    State(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, TransferError>;
