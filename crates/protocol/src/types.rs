use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a file stored on the remote service.
///
/// Returned in the final chunk response of an upload and by the
/// file-info endpoint when resolving a download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub id: String,
    pub name: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub secured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub download_url: String,
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// Error body returned by the API on non-success responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}
