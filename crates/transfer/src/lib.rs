//! Transfer core: stream chunking and byte-range accounting.
//!
//! Transport-agnostic building blocks for the chunked upload protocol.
//! `ChunkStream` turns an async byte source into bounded buffers;
//! `TransferState`/`RangeDescriptor` map those buffers onto the byte
//! ranges of one transfer.

mod chunker;
mod progress;
mod range;
mod validation;

pub use chunker::ChunkStream;
pub use progress::SpeedCalculator;
pub use range::{RangeDescriptor, TransferState};
pub use validation::validate_remote_path;

/// Default chunking threshold: 64 KiB.
///
/// The upload path always passes an explicit threshold; this default
/// serves callers chunking arbitrary streams.
pub const DEFAULT_THRESHOLD: usize = 64 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}
