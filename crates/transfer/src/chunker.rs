use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{DEFAULT_THRESHOLD, TransferError};

/// Pull-driven chunker over an async byte source.
///
/// Accumulates upstream reads into a growable buffer until it reaches
/// the threshold, then yields the buffer whole and starts a new one.
/// When the source is exhausted, whatever has accumulated is yielded as
/// the final chunk regardless of size; an empty tail is not yielded.
///
/// The sequence is finite, single-pass, and preserves source byte order
/// exactly in the concatenation of yielded chunks.
pub struct ChunkStream<R> {
    source: R,
    threshold: usize,
    buf: BytesMut,
    eof: bool,
}

impl<R: AsyncRead + Unpin> ChunkStream<R> {
    /// Creates a chunker reading from `source`.
    ///
    /// If `threshold` is 0, [`DEFAULT_THRESHOLD`] (64 KiB) is used.
    pub fn new(source: R, threshold: usize) -> Self {
        let threshold = if threshold == 0 {
            DEFAULT_THRESHOLD
        } else {
            threshold
        };
        Self {
            source,
            threshold,
            buf: BytesMut::new(),
            eof: false,
        }
    }

    /// Returns the next chunk, or `None` once the source is exhausted.
    ///
    /// One upstream read is issued per loop step while the running
    /// buffer is below the threshold; each read may suspend. Reads are
    /// capped at the bytes still needed, so every chunk except possibly
    /// the last has length equal to the threshold.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, TransferError> {
        while !self.eof && self.buf.len() < self.threshold {
            let want = self.threshold - self.buf.len();
            let n = self.source.read_buf(&mut (&mut self.buf).limit(want)).await?;
            if n == 0 {
                self.eof = true;
            }
        }

        if self.buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.buf.split().freeze()))
    }

    /// The chunking threshold in bytes.
    pub fn threshold(&self) -> usize {
        self.threshold
    }
}
