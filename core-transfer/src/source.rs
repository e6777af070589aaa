//! Chunk Sources
//!
//! Concrete inputs for the transfer engine: a random-access local file,
//! and a wrapper turning any provider [`RangeFetcher`] into a strictly
//! sequential remote source.

use async_trait::async_trait;
use bytes::Bytes;
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};
use tracing::debug;
use transport_traits::error::{Result, TransportError};
use transport_traits::source::{ChunkSource, RangeFetcher};

use crate::bounded::BoundedChunkReader;

/// Random-access source over an open local file. Any offset/length
/// combination is legal.
pub struct LocalFileSource {
    descriptor: String,
    file: File,
}

impl LocalFileSource {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::open(&path).await?;
        Ok(Self {
            descriptor: path.display().to_string(),
            file,
        })
    }
}

#[async_trait]
impl ChunkSource for LocalFileSource {
    fn descriptor(&self) -> &str {
        &self.descriptor
    }

    async fn total_len(&mut self) -> Result<u64> {
        Ok(self.file.metadata().await?.len())
    }

    async fn read(&mut self, offset: u64, length: u64) -> Result<Bytes> {
        self.file.seek(SeekFrom::Start(offset)).await?;

        let mut buf = vec![0u8; length as usize];
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.file.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        buf.truncate(filled);

        Ok(Bytes::from(buf))
    }
}

/// Sequential source over a remote range-fetchable object.
///
/// One ranged GET is opened per session and sliced into chunk-sized
/// reads through [`BoundedChunkReader`], so the object is never
/// buffered whole. Each read must start exactly where the previous one
/// ended: providers charge per connection, and random access would
/// force a fresh connection per chunk. A non-contiguous read is a
/// caller error, not a reconnect.
pub struct RemoteChunkSource<F> {
    fetcher: F,
    stream: Option<Box<dyn AsyncRead + Send + Unpin>>,
    next_offset: u64,
}

impl<F: RangeFetcher> RemoteChunkSource<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            stream: None,
            next_offset: 0,
        }
    }

    /// Offset the next read must start at once a stream is open.
    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }
}

#[async_trait]
impl<F: RangeFetcher> ChunkSource for RemoteChunkSource<F> {
    fn descriptor(&self) -> &str {
        self.fetcher.descriptor()
    }

    async fn total_len(&mut self) -> Result<u64> {
        self.fetcher.content_length().await
    }

    async fn read(&mut self, offset: u64, length: u64) -> Result<Bytes> {
        match &self.stream {
            Some(_) if offset != self.next_offset => {
                return Err(TransportError::NonContiguousRead {
                    requested: offset,
                    expected: self.next_offset,
                });
            }
            Some(_) => {}
            None => {
                debug!(descriptor = self.fetcher.descriptor(), offset, "opening ranged download");
                let stream = self.fetcher.open_from(offset).await?;
                self.next_offset = offset;
                self.stream = Some(stream);
            }
        }

        let mut chunk = Vec::with_capacity(length as usize);
        if let Some(stream) = self.stream.as_mut() {
            let mut bounded = BoundedChunkReader::new(stream, length);
            bounded.read_to_end(&mut chunk).await?;
        }

        self.next_offset += chunk.len() as u64;
        Ok(Bytes::from(chunk))
    }
}
