//! Upload-session creation and file resolution.

use bytes::Bytes;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use stashbox_protocol::{FileInfo, UploadSessionRequest, UploadSessionResponse};
use stashbox_transfer::validate_remote_path;
use tracing::debug;

use crate::{Client, ClientError};

/// An upload session issued by the service.
///
/// `location` is the one-time destination URL for chunk requests.
/// The raw session response is retained because a zero-length upload
/// has no chunk response to hand back.
#[derive(Debug, Clone)]
pub struct UploadSession {
    pub location: String,
    pub status: u16,
    pub raw_body: Bytes,
}

impl Client {
    /// Creates an upload session for a file of `size` bytes.
    ///
    /// A response without a location is an authorization failure on the
    /// service side and surfaces as [`ClientError::SessionCreation`].
    pub async fn create_upload_session(
        &self,
        name: &str,
        size: u64,
        remote_path: &str,
        secured: bool,
    ) -> Result<UploadSession, ClientError> {
        validate_remote_path(remote_path)?;
        let auth = self.ensure_session().await?;

        let req = UploadSessionRequest {
            name: name.to_string(),
            size,
            path: remote_path.to_string(),
            token: auth.token.clone(),
            secured,
        };

        let url = self.api_url("/api/files/upload");
        debug!(url = %url, name, size, "creating upload session");

        let resp = self
            .http()
            .post(&url)
            .headers(self.session_headers(Some(&auth)))
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        let raw_body = resp.bytes().await?;

        if !status.is_success() {
            return Err(ClientError::SessionCreation(format!(
                "session request failed with status {status}"
            )));
        }

        let parsed: UploadSessionResponse = serde_json::from_slice(&raw_body)?;
        let location = parsed
            .location
            .filter(|l| !l.is_empty())
            .ok_or_else(|| {
                ClientError::SessionCreation("response carried no upload location".into())
            })?;

        Ok(UploadSession {
            location,
            status: status.as_u16(),
            raw_body,
        })
    }

    /// Fetches metadata for a stored file by id.
    pub async fn file_info(&self, id: &str) -> Result<FileInfo, ClientError> {
        // Public files resolve without an account; log in only when
        // credentials were supplied.
        let headers = if self.has_credentials() {
            let auth = self.ensure_session().await?;
            self.session_headers(Some(&auth))
        } else {
            self.session_headers(None)
        };

        let encoded = utf8_percent_encode(id, NON_ALPHANUMERIC).to_string();
        let url = self.api_url(&format!("/api/files/{encoded}"));
        let resp = self.http().get(&url).headers(headers).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::SessionCreation(format!(
                "file lookup failed with status {status}"
            )));
        }

        Ok(serde_json::from_slice(&resp.bytes().await?)?)
    }

    /// Resolves a download target — a full URL or a file id — to the
    /// URL to fetch.
    pub async fn resolve_download_url(&self, target: &str) -> Result<String, ClientError> {
        if target.starts_with("http://") || target.starts_with("https://") {
            return Ok(target.to_string());
        }

        let info = self.file_info(target).await?;
        if info.download_url.is_empty() {
            return Err(ClientError::SessionCreation(format!(
                "no download location for file {target}"
            )));
        }
        Ok(info.download_url)
    }

}
