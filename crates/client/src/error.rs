//! Client error types.

/// Errors produced by the stashbox client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("session creation failed: {0}")]
    SessionCreation(String),

    #[error("chunk transfer failed with status {status}: {body}")]
    ChunkTransfer { status: u16, body: String },

    #[error("server requested redirect to {location}")]
    RedirectRequested { location: String },

    #[error("download failed with status {status}")]
    Download { status: u16 },

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("cancelled")]
    Cancelled,

    #[error("transfer error: {0}")]
    Transfer(#[from] stashbox_transfer::TransferError),
}
