//! The range upload driver.
//!
//! Converts a byte source into a strictly sequential series of
//! `Content-Range`-tagged POST requests against an upload session's
//! location URL, one chunk in flight at a time.

use bytes::Bytes;
use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE};
use stashbox_transfer::{ChunkStream, TransferState};
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::session::UploadSession;
use crate::{AuthSession, Client, ClientError, RedirectMode, TransferEvent, UploadOutcome};

/// Default chunk size: 16 MiB.
///
/// Matches the service's preferred upload granularity; callers may
/// override it per upload.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Drives one chunked upload.
///
/// The driver owns no connection state; it borrows the [`Client`] for
/// its HTTP stack and header template. All byte accounting is scoped to
/// a single [`run`](Self::run) call, so concurrent uploads through the
/// same client never share counters.
pub struct RangeUpload<'a> {
    client: &'a Client,
    cancel: CancellationToken,
    chunk_size: usize,
    redirect: RedirectMode,
}

impl<'a> RangeUpload<'a> {
    /// Creates an upload driver with the default chunk size and
    /// `follow` redirect mode.
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            cancel: CancellationToken::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            redirect: RedirectMode::Follow,
        }
    }

    /// Overrides the chunk size. 0 keeps [`DEFAULT_CHUNK_SIZE`].
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        if chunk_size > 0 {
            self.chunk_size = chunk_size;
        }
        self
    }

    /// Sets the redirect mode.
    pub fn with_redirect(mut self, mode: RedirectMode) -> Self {
        self.redirect = mode;
        self
    }

    /// Uses an external cancellation token.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Uploads `total_size` bytes from `source` as `name` under
    /// `remote_path`.
    ///
    /// Logs in (lazily), creates the upload session, then streams
    /// chunks sequentially. Progress events are sent via `events_tx`.
    /// The declared `total_size` must match what the source delivers;
    /// a mismatch is the caller's contract violation and shows up as a
    /// short (or overlong) final range on the wire.
    pub async fn run<R: AsyncRead + Unpin>(
        &self,
        source: R,
        name: &str,
        remote_path: &str,
        total_size: u64,
        secured: bool,
        events_tx: &mpsc::Sender<TransferEvent>,
    ) -> Result<UploadOutcome, ClientError> {
        let auth = self.client.ensure_session().await?;
        let session = self
            .client
            .create_upload_session(name, total_size, remote_path, secured)
            .await?;

        match self.redirect {
            RedirectMode::Manual => {
                info!(location = %session.location, "manual redirect mode, returning destination");
                return Ok(UploadOutcome::Redirect {
                    location: session.location,
                });
            }
            RedirectMode::Error => {
                return Err(ClientError::RedirectRequested {
                    location: session.location,
                });
            }
            RedirectMode::Follow => {}
        }

        match self
            .transfer(&auth, &session, source, total_size, events_tx)
            .await
        {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                let _ = events_tx
                    .send(TransferEvent::Failed {
                        error: e.to_string(),
                    })
                    .await;
                Err(e)
            }
        }
    }

    /// The chunk loop: pull, range, POST, repeat.
    async fn transfer<R: AsyncRead + Unpin>(
        &self,
        auth: &AuthSession,
        session: &UploadSession,
        source: R,
        total_size: u64,
        events_tx: &mpsc::Sender<TransferEvent>,
    ) -> Result<UploadOutcome, ClientError> {
        let mut chunks = ChunkStream::new(source, self.chunk_size);
        let mut state = TransferState::new(total_size);
        let headers = self.client.chunk_headers(auth);
        let mut last: Option<(u16, Bytes)> = None;

        loop {
            self.check_cancelled()?;

            let Some(chunk) = chunks.next_chunk().await? else {
                break;
            };

            let range = state.advance(chunk.len() as u64);
            debug!(range = %range, len = chunk.len(), "sending chunk");

            let request = self
                .client
                .http()
                .post(&session.location)
                .headers(headers.clone())
                .header(CONTENT_LENGTH, chunk.len())
                .header(CONTENT_RANGE, range.to_string())
                .body(chunk);

            // Cancellation mid-chunk fails the in-flight request; the
            // remote session is left as-is.
            let resp = tokio::select! {
                _ = self.cancel.cancelled() => return Err(ClientError::Cancelled),
                r = request.send() => r?,
            };

            let status = resp.status();
            let body = resp.bytes().await?;

            if !status.is_success() {
                return Err(ClientError::ChunkTransfer {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&body).into_owned(),
                });
            }

            let _ = events_tx
                .send(TransferEvent::Progress {
                    bytes_sent: state.bytes_sent(),
                    total: state.total(),
                    chunk_len: range.len(),
                })
                .await;

            last = Some((status.as_u16(), body));
        }

        // A zero-length upload produces no chunks; the session response
        // is the call's result.
        let outcome = match last {
            Some((status, body)) => UploadOutcome::Completed { status, body },
            None => UploadOutcome::Completed {
                status: session.status,
                body: session.raw_body.clone(),
            },
        };

        info!(bytes = state.bytes_sent(), total = total_size, "upload finished");
        let _ = events_tx
            .send(TransferEvent::Completed {
                bytes_sent: state.bytes_sent(),
            })
            .await;

        Ok(outcome)
    }

    fn check_cancelled(&self) -> Result<(), ClientError> {
        if self.cancel.is_cancelled() {
            Err(ClientError::Cancelled)
        } else {
            Ok(())
        }
    }
}
