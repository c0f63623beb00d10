//! HTTP client for the stashbox file-hosting service.
//!
//! [`Client`] wraps a `reqwest` client with the service base URL, a
//! default header template, and a lazily-cached login session.
//! [`RangeUpload`] drives the chunked upload protocol against a
//! session location URL; [`Client::download_to_file`] streams a remote
//! file to disk.

mod auth;
mod download;
mod error;
mod session;
mod types;
mod upload;

pub use auth::{AuthSession, Credentials};
pub use download::remote_file_name;
pub use error::ClientError;
pub use session::UploadSession;
pub use types::{RedirectMode, TransferEvent, UploadOutcome};
pub use upload::{DEFAULT_CHUNK_SIZE, RangeUpload};

use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, AUTHORIZATION, CONNECTION, COOKIE, HeaderMap,
    HeaderName, HeaderValue,
};
use tokio::sync::Mutex;

/// Client for the stashbox API.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
    extra_headers: HeaderMap,
    auth: Mutex<Option<AuthSession>>,
}

impl Client {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            credentials: None,
            extra_headers: HeaderMap::new(),
            auth: Mutex::new(None),
        })
    }

    /// Sets the credentials used for login and basic authorization.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Adds a caller-supplied header to the default template.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ClientError> {
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| ClientError::InvalidHeader(name.to_string()))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|_| ClientError::InvalidHeader(value.to_string()))?;
        self.extra_headers.insert(name, value);
        Ok(self)
    }

    /// The service base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Headers for authenticated API requests: the caller-supplied
    /// template, basic authorization when credentials exist, and the
    /// session cookie once logged in.
    pub(crate) fn session_headers(&self, auth: Option<&AuthSession>) -> HeaderMap {
        let mut headers = self.extra_headers.clone();

        if let Some(creds) = &self.credentials
            && let Ok(value) = HeaderValue::from_str(&creds.basic_authorization())
        {
            headers.insert(AUTHORIZATION, value);
        }

        if let Some(auth) = auth
            && let Some(cookie) = &auth.cookie
            && let Ok(value) = HeaderValue::from_str(cookie)
        {
            headers.insert(COOKIE, value);
        }

        headers
    }

    /// Headers for chunk requests to a session location URL.
    ///
    /// Same as the session headers, except basic authorization must
    /// never reach the upload endpoint. The remaining entries are
    /// conventional and carry no protocol meaning.
    pub(crate) fn chunk_headers(&self, auth: &AuthSession) -> HeaderMap {
        let mut headers = self.session_headers(Some(auth));
        headers.remove(AUTHORIZATION);

        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );
        headers.insert(
            ACCEPT_ENCODING,
            HeaderValue::from_static("gzip, deflate, br"),
        );
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers
    }

    /// Returns the cached login session, logging in first if needed.
    ///
    /// Login runs at most once per client; a failure aborts the whole
    /// operation and becomes its result.
    pub async fn ensure_session(&self) -> Result<AuthSession, ClientError> {
        let mut guard = self.auth.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(session.clone());
        }

        let session = self.login().await?;
        *guard = Some(session.clone());
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_joins_without_double_slash() {
        let client = Client::new("https://api.example.com/").unwrap();
        assert_eq!(
            client.api_url("/api/login"),
            "https://api.example.com/api/login"
        );
    }

    #[test]
    fn with_header_rejects_garbage() {
        let client = Client::new("https://api.example.com").unwrap();
        assert!(client.with_header("bad name", "v").is_err());
    }

    #[test]
    fn session_headers_include_basic_auth() {
        let client = Client::new("https://api.example.com")
            .unwrap()
            .with_credentials(Credentials::new("alice", "secret"));
        let headers = client.session_headers(None);
        let auth = headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert!(auth.starts_with("Basic "));
    }

    #[test]
    fn chunk_headers_strip_basic_auth() {
        let client = Client::new("https://api.example.com")
            .unwrap()
            .with_credentials(Credentials::new("alice", "secret"));
        let session = AuthSession {
            token: "tok".into(),
            cookie: Some("stashbox_session=abc".into()),
        };

        let headers = client.chunk_headers(&session);
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(
            headers.get(COOKIE).unwrap().to_str().unwrap(),
            "stashbox_session=abc"
        );
        assert_eq!(headers.get(ACCEPT).unwrap(), "*/*");
        assert_eq!(headers.get(CONNECTION).unwrap(), "keep-alive");
    }

    #[test]
    fn chunk_headers_keep_caller_headers() {
        let client = Client::new("https://api.example.com")
            .unwrap()
            .with_header("X-Trace", "t-1")
            .unwrap();
        let session = AuthSession {
            token: "tok".into(),
            cookie: None,
        };
        let headers = client.chunk_headers(&session);
        assert_eq!(headers.get("X-Trace").unwrap(), "t-1");
    }
}
