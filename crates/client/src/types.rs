//! Data types for the client surface.

use std::str::FromStr;

use bytes::Bytes;
use stashbox_protocol::FileInfo;

/// Redirect policy for an upload call.
///
/// `Follow` performs the full chunk transfer. `Manual` creates the
/// upload session but transfers nothing, returning the destination URL
/// to the caller. `Error` fails as soon as the destination is known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RedirectMode {
    #[default]
    Follow,
    Manual,
    Error,
}

impl FromStr for RedirectMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "follow" => Ok(RedirectMode::Follow),
            "manual" => Ok(RedirectMode::Manual),
            "error" => Ok(RedirectMode::Error),
            other => Err(format!("unknown redirect mode: {other}")),
        }
    }
}

/// Result of an upload call.
#[derive(Debug, Clone)]
pub enum UploadOutcome {
    /// The transfer ran to completion. Status and raw body of the last
    /// response — the final chunk's, or the session-creation response
    /// for a zero-length upload.
    Completed { status: u16, body: Bytes },
    /// Manual redirect mode: nothing was transferred; the destination
    /// URL is handed back directly.
    Redirect { location: String },
}

impl UploadOutcome {
    /// Parses the response body as finished-file metadata, if present.
    ///
    /// The body is opaque to the transfer core; this is a convenience
    /// for callers that want the structured form.
    pub fn file_info(&self) -> Option<FileInfo> {
        match self {
            UploadOutcome::Completed { body, .. } => serde_json::from_slice(body).ok(),
            UploadOutcome::Redirect { .. } => None,
        }
    }
}

/// Progress event emitted during a transfer.
#[derive(Debug, Clone)]
pub enum TransferEvent {
    /// A chunk round trip finished.
    Progress {
        bytes_sent: u64,
        total: u64,
        chunk_len: u64,
    },
    /// The transfer finished.
    Completed { bytes_sent: u64 },
    /// The transfer failed.
    Failed { error: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_mode_parses() {
        assert_eq!("follow".parse::<RedirectMode>().unwrap(), RedirectMode::Follow);
        assert_eq!("manual".parse::<RedirectMode>().unwrap(), RedirectMode::Manual);
        assert_eq!("error".parse::<RedirectMode>().unwrap(), RedirectMode::Error);
        assert!("chase".parse::<RedirectMode>().is_err());
    }

    #[test]
    fn outcome_parses_file_info() {
        let body = Bytes::from_static(
            br#"{"id":"f1","name":"a.bin","size":10,"downloadUrl":"https://x/f1"}"#,
        );
        let outcome = UploadOutcome::Completed { status: 200, body };
        let info = outcome.file_info().unwrap();
        assert_eq!(info.id, "f1");
        assert_eq!(info.size, 10);
    }

    #[test]
    fn outcome_opaque_body_is_none() {
        let outcome = UploadOutcome::Completed {
            status: 200,
            body: Bytes::from_static(b"not json"),
        };
        assert!(outcome.file_info().is_none());
    }

    #[test]
    fn redirect_outcome_has_no_file_info() {
        let outcome = UploadOutcome::Redirect {
            location: "https://upload.example.com/s/1".into(),
        };
        assert!(outcome.file_info().is_none());
    }
}
