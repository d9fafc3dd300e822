//! JSON bodies exchanged with the GitHub REST API and the mapping from HTTP
//! status codes to [`Error`] kinds.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Deserialize)]
pub struct RepoBody {
    pub full_name: String,
    pub default_branch: String,
}

#[derive(Debug, Deserialize)]
pub struct RefBody {
    #[serde(rename = "ref")]
    pub reference: String,
    pub object: RefObject,
}

#[derive(Debug, Deserialize)]
pub struct RefObject {
    pub sha: String,
}

#[derive(Debug, Serialize)]
pub struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    pub reference: &'a str,
    pub sha: &'a str,
}

/// Single entry from `GET /repos/{o}/{r}/contents/{path}`.
#[derive(Debug, Deserialize)]
pub struct ContentBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub sha: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

impl ContentBody {
    /// Decode the inlined blob. GitHub wraps base64 at 60 columns and
    /// returns `encoding: "none"` for files too large to inline.
    pub fn decoded(&self) -> Option<Vec<u8>> {
        if self.encoding.as_deref() != Some("base64") {
            return None;
        }
        let raw: String = self
            .content
            .as_deref()?
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        STANDARD.decode(raw).ok()
    }
}

#[derive(Debug, Serialize)]
pub struct PutContentBody<'a> {
    pub message: &'a str,
    pub content: String,
    pub branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

impl<'a> PutContentBody<'a> {
    pub fn new(message: &'a str, content: &[u8], branch: &'a str, sha: Option<&'a str>) -> Self {
        Self {
            message,
            content: STANDARD.encode(content),
            branch,
            sha,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PutContentResponse {
    pub content: PutContentFile,
}

#[derive(Debug, Deserialize)]
pub struct PutContentFile {
    pub sha: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Translate a non-success response into an [`Error`].
///
/// `what` names the operation for the message, e.g. `create ref feature-x`.
pub fn classify(status: StatusCode, rate_limited: bool, body: &str, what: &str) -> Error {
    let api_msg = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.trim().to_string());
    let msg = if api_msg.is_empty() {
        format!("{}: HTTP {}", what, status.as_u16())
    } else {
        format!("{}: HTTP {}: {}", what, status.as_u16(), api_msg)
    };

    match status.as_u16() {
        401 => Error::Unauthorized(msg),
        403 if rate_limited => Error::Transient(msg),
        403 => Error::Unauthorized(msg),
        404 => Error::NotFound(msg),
        409 => Error::Conflict(msg),
        422 if is_conflict_message(&api_msg) => Error::Conflict(msg),
        413 | 422 => Error::InvalidInput(msg),
        429 => Error::Transient(msg),
        s if s >= 500 => Error::Transient(msg),
        _ => Error::InvalidInput(msg),
    }
}

fn is_conflict_message(msg: &str) -> bool {
    let m = msg.to_ascii_lowercase();
    m.contains("already exists") || m.contains("does not match") || m.contains("\"sha\" wasn't supplied")
}
