use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Response to a login request.
///
/// A missing or empty token means the credentials were rejected even
/// though the request itself succeeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub expires_in: u64,
}

// ---------------------------------------------------------------------------
// Upload sessions
// ---------------------------------------------------------------------------

/// Creates an upload session for a single file.
///
/// `size` must match the total number of bytes the chunk requests will
/// carry; the service sizes the upload slot from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSessionRequest {
    pub name: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub secured: bool,
}

/// Response to an upload session request.
///
/// `location` is the one-time destination URL for chunk uploads. Its
/// absence signals an authorization failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSessionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}

fn is_false(v: &bool) -> bool {
    !*v
}
