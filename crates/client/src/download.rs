//! Streaming file download.

use std::path::Path;

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{Client, ClientError, TransferEvent};

impl Client {
    /// Downloads `target` (a full URL or a file id) to `dest`.
    ///
    /// The body is streamed to disk chunk-wise, never buffered whole.
    /// Returns the number of bytes written.
    pub async fn download_to_file(
        &self,
        target: &str,
        dest: &Path,
        events_tx: &mpsc::Sender<TransferEvent>,
    ) -> Result<u64, ClientError> {
        let url = self.resolve_download_url(target).await?;

        let headers = if self.has_credentials() {
            let auth = self.ensure_session().await?;
            self.session_headers(Some(&auth))
        } else {
            self.session_headers(None)
        };

        debug!(url = %url, dest = %dest.display(), "starting download");
        let resp = self.http().get(&url).headers(headers).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Download {
                status: status.as_u16(),
            });
        }

        let total = resp.content_length().unwrap_or(0);
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written: u64 = 0;

        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            let _ = events_tx
                .send(TransferEvent::Progress {
                    bytes_sent: written,
                    total,
                    chunk_len: chunk.len() as u64,
                })
                .await;
        }

        file.flush().await?;
        info!(bytes = written, dest = %dest.display(), "download finished");
        let _ = events_tx
            .send(TransferEvent::Completed {
                bytes_sent: written,
            })
            .await;

        Ok(written)
    }
}

/// Derives an output file name from a download target, curl `-O` style:
/// the final path segment of the URL or id, query and fragment stripped.
pub fn remote_file_name(target: &str) -> Option<String> {
    let without_fragment = target.split('#').next().unwrap_or(target);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);
    let name = without_query.rsplit('/').next().unwrap_or(without_query);

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
