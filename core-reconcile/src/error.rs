use thiserror::Error;
use transport_traits::error::TransportError;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("listing collection {collection_id}: {source}")]
    List {
        collection_id: String,
        source: TransportError,
    },

    #[error("deleting item {item_id} ({external_id}): {source}")]
    Delete {
        item_id: String,
        external_id: String,
        source: TransportError,
    },

    #[error("inserting {external_id}: {source}")]
    Insert {
        external_id: String,
        source: TransportError,
    },

    #[error("moving item {item_id} to position {position}: {source}")]
    Reposition {
        item_id: String,
        position: usize,
        source: TransportError,
    },
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
