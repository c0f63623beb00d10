use std::fmt;

/// Byte range of one chunk within a transfer.
///
/// `start` and `end` are inclusive offsets; `total` is the declared size
/// of the whole transfer. Carried on the wire as the `Content-Range`
/// header value `bytes {start}-{end}/{total}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeDescriptor {
    pub start: u64,
    pub end: u64,
    pub total: u64,
}

impl RangeDescriptor {
    /// Number of bytes the range covers.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// A range always covers at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `true` when this range ends exactly at the declared total.
    pub fn is_final(&self) -> bool {
        self.end + 1 == self.total
    }
}

impl fmt::Display for RangeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytes {}-{}/{}", self.start, self.end, self.total)
    }
}

/// Byte accounting for one upload call.
///
/// Owned by a single driver invocation. Concurrent uploads each carry
/// their own state; nothing here is shared.
#[derive(Debug)]
pub struct TransferState {
    bytes_sent: u64,
    total: u64,
}

impl TransferState {
    /// Creates accounting for a transfer declaring `total` bytes.
    pub fn new(total: u64) -> Self {
        Self {
            bytes_sent: 0,
            total,
        }
    }

    /// Returns the range covering the next `len` bytes and advances the
    /// cumulative counter past them.
    ///
    /// `len` must be non-zero; empty chunks have no range.
    pub fn advance(&mut self, len: u64) -> RangeDescriptor {
        debug_assert!(len > 0, "empty chunk has no range");
        let desc = RangeDescriptor {
            start: self.bytes_sent,
            end: self.bytes_sent + len - 1,
            total: self.total,
        };
        self.bytes_sent += len;
        desc
    }

    /// Cumulative bytes ranged so far.
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// The declared transfer size.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Returns `true` once the counter has reached the declared total.
    ///
    /// Remains `false` when the source delivered fewer bytes than
    /// declared — that mismatch is the caller's contract violation and
    /// is left visible rather than masked.
    pub fn is_complete(&self) -> bool {
        self.bytes_sent == self.total
    }
}
