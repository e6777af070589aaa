//! Byte-Source Abstractions
//!
//! The transfer engine reads its content through [`ChunkSource`], one
//! implementation per backend, selected at construction. Remote
//! backends implement the narrower [`RangeFetcher`] instead; the engine
//! supplies the shared stream-slicing logic on top of it.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// A byte-addressable input for the transfer engine.
#[async_trait]
pub trait ChunkSource: Send {
    /// Opaque identifier of the underlying target (a filesystem path or
    /// a remote file id). Persisted with the transfer session so a
    /// restarted process can bind the same content.
    fn descriptor(&self) -> &str;

    /// Total length of the content in bytes.
    async fn total_len(&mut self) -> Result<u64>;

    /// Read `length` bytes starting at `offset`.
    ///
    /// Only the final read of the content may come back short. Local
    /// sources accept any offset; remote sources require each read to
    /// start exactly where the previous one ended.
    async fn read(&mut self, offset: u64, length: u64) -> Result<Bytes>;
}

/// Provider-specific half of a remote chunk source.
///
/// The two cloud backends differ only in the shape of their HTTP calls:
/// how to learn the content length, and how to open a sequential
/// download starting at a byte offset. Everything else — slicing the
/// stream into chunks, enforcing contiguity — is shared.
#[async_trait]
pub trait RangeFetcher: Send {
    /// Opaque identifier of the remote object.
    fn descriptor(&self) -> &str;

    /// Size of the remote object in bytes.
    async fn content_length(&mut self) -> Result<u64>;

    /// Open a download stream beginning at `offset` and running to the
    /// end of the object.
    async fn open_from(&mut self, offset: u64)
        -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>>;
}
