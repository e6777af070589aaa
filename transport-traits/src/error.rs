use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    /// No response was received: connect failure, timeout, broken
    /// stream. Nothing remote has been acknowledged, so callers may
    /// retry the whole operation later.
    #[error("network error: {0}")]
    Network(String),

    /// A remote call answered with a status the caller cannot act on.
    #[error("unexpected status {status}: {detail}")]
    Status { status: u16, detail: String },

    /// A remote range source was asked to read from an offset other
    /// than the end of the previously served range.
    #[error("non-contiguous read: requested offset {requested}, expected {expected}")]
    NonContiguousRead { requested: u64, expected: u64 },

    #[error("transport operation failed: {0}")]
    OperationFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
