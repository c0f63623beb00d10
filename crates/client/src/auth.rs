//! Login and session authentication.

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::header::SET_COOKIE;
use stashbox_protocol::LoginResponse;
use tracing::{debug, info};

use crate::{Client, ClientError};

/// Username/password pair for basic authorization and login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The `Authorization` header value: `Basic <base64(user:password)>`.
    pub fn basic_authorization(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

/// An authenticated session: API token plus the session cookie the
/// service set at login.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub cookie: Option<String>,
}

impl Client {
    /// Logs in with the configured credentials.
    ///
    /// Succeeding transport-wise but receiving no usable token is still
    /// an authentication failure.
    pub async fn login(&self) -> Result<AuthSession, ClientError> {
        let Some(creds) = &self.credentials else {
            return Err(ClientError::Auth("no credentials supplied".into()));
        };

        let url = self.api_url("/api/login");
        debug!(url = %url, "logging in");

        let resp = self
            .http()
            .post(&url)
            .headers(self.session_headers(None))
            .send()
            .await?;

        let status = resp.status();

        // Cookie attributes past the first `;` are not ours to replay.
        let cookie = resp
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(';').next())
            .map(str::to_owned);

        if !status.is_success() {
            return Err(ClientError::Auth(format!(
                "login failed with status {status}"
            )));
        }

        let body: LoginResponse = serde_json::from_slice(&resp.bytes().await?)?;
        if body.token.is_empty() {
            return Err(ClientError::Auth("login returned no token".into()));
        }

        info!(username = %creds.username, "logged in");

        Ok(AuthSession {
            token: body.token,
            cookie,
        })
    }
}
