//! Byte-Limited Read Adapter
//!
//! Slices a long-lived download stream into upload-chunk-sized reads.
//! The underlying stream needs no chunk awareness and nothing is
//! buffered beyond the caller's own read buffer.

use std::io;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Caps an inner stream at a fixed number of bytes.
///
/// Once `limit` bytes have been delivered the reader reports end of
/// stream, regardless of whether the inner stream has more data. A new
/// `BoundedChunkReader` over the same inner stream continues where the
/// previous one stopped.
pub struct BoundedChunkReader<R> {
    inner: R,
    limit: u64,
    delivered: u64,
}

impl<R> BoundedChunkReader<R> {
    pub fn new(inner: R, limit: u64) -> Self {
        Self {
            inner,
            limit,
            delivered: 0,
        }
    }

    /// Bytes handed out so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for BoundedChunkReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let me = self.get_mut();

        let remaining = me.limit.saturating_sub(me.delivered);
        if remaining == 0 {
            return Poll::Ready(Ok(()));
        }

        let cap = remaining.min(buf.remaining() as u64) as usize;
        let mut limited = buf.take(cap);
        ready!(Pin::new(&mut me.inner).poll_read(cx, &mut limited))?;

        let n = limited.filled().len();
        // `limited` borrowed the unfilled part of `buf`, so the bytes
        // are already in place; account for them.
        unsafe { buf.assume_init(n) };
        buf.advance(n);
        me.delivered += n as u64;

        Poll::Ready(Ok(()))
    }
}
