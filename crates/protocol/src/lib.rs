//! Wire types for the stashbox file-hosting API.
//!
//! JSON request/response payloads exchanged with the remote service.
//! Pure data definitions; all I/O lives in `stashbox-client`.

pub mod messages;
pub mod types;

pub use messages::{LoginResponse, UploadSessionRequest, UploadSessionResponse};
pub use types::{ApiError, FileInfo};
