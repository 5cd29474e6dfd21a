//! Pinning proxy.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser cannot hold the pinning API key pair, so the listing form
//! uploads here and this module forwards to the pinning API with the key
//! headers attached. Responses are passed back as the API's own
//! `{IpfsHash, PinSize, Timestamp}` document.
//!
//! ERROR HANDLING
//! ==============
//! Missing credentials answer 503, malformed uploads 400, a caller over its
//! per-address allowance 429, and any upstream failure 502 with the
//! upstream status in the log. Error bodies are
//! `{ "error": ..., "code": ... }`.

#[cfg(test)]
#[path = "pin_test.rs"]
mod pin_test;

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use market::config::PinningCredentials;
use market::gateway::{
    API_KEY_HEADER, NftMetadata, PIN_FILE_PATH, PIN_JSON_PATH, PinResponse, SECRET_KEY_HEADER, pin_endpoint, pin_json_body,
};
use serde_json::json;

use crate::rate_limit::RateLimitError;
use crate::state::AppState;

/// Multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, thiserror::Error)]
pub enum PinError {
    #[error("pinning is not configured")]
    NotConfigured,
    #[error(transparent)]
    RateLimited(#[from] RateLimitError),
    #[error("missing multipart field `file`")]
    MissingFile,
    #[error("invalid upload: {0}")]
    BadUpload(String),
    #[error("pinning API returned {status}")]
    Upstream { status: u16, body: String },
    #[error("pinning API unreachable: {0}")]
    Transport(String),
}

impl PinError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::MissingFile | Self::BadUpload(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } | Self::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::NotConfigured => "E_PIN_NOT_CONFIGURED",
            Self::RateLimited(_) => "E_RATE_LIMITED",
            Self::MissingFile => "E_PIN_MISSING_FILE",
            Self::BadUpload(_) => "E_PIN_BAD_UPLOAD",
            Self::Upstream { .. } => "E_PIN_UPSTREAM",
            Self::Transport(_) => "E_PIN_TRANSPORT",
        }
    }
}

impl IntoResponse for PinError {
    fn into_response(self) -> Response {
        if let Self::Upstream { status, body } = &self {
            tracing::warn!(status, body = %body, "pinning API rejected request");
        }
        (self.status(), Json(json!({ "error": self.to_string(), "code": self.code() }))).into_response()
    }
}

/// Credentials for an upstream call, charged against the caller's allowance.
fn admit(state: &AppState, peer: SocketAddr) -> Result<&PinningCredentials, PinError> {
    let creds = state.pinning.as_deref().ok_or(PinError::NotConfigured)?;
    if let Err(e) = state.pin_limiter.check_and_record(peer.ip()) {
        tracing::warn!(client = %peer.ip(), "pin request rate limited");
        return Err(e.into());
    }
    Ok(creds)
}

async fn send_pin(request: reqwest::RequestBuilder, creds: &PinningCredentials) -> Result<PinResponse, PinError> {
    let resp = request
        .header(API_KEY_HEADER, &creds.api_key)
        .header(SECRET_KEY_HEADER, &creds.secret_api_key)
        .send()
        .await
        .map_err(|e| PinError::Transport(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(PinError::Upstream { status: status.as_u16(), body });
    }
    resp.json::<PinResponse>().await.map_err(|e| PinError::Transport(e.to_string()))
}

/// `POST /api/pin/file`: forward one multipart `file` field.
pub async fn pin_file(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    mut multipart: Multipart,
) -> Result<Json<PinResponse>, PinError> {
    let creds = admit(&state, peer)?;
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| PinError::BadUpload(e.to_string()))? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_owned();
        let mime = field.content_type().unwrap_or("application/octet-stream").to_owned();
        let bytes = field.bytes().await.map_err(|e| PinError::BadUpload(e.to_string()))?;
        upload = Some((file_name, mime, bytes));
        break;
    }
    let (file_name, mime, bytes) = upload.ok_or(PinError::MissingFile)?;
    let size = bytes.len();

    let part = reqwest::multipart::Part::bytes(bytes.to_vec())
        .file_name(file_name.clone())
        .mime_str(&mime)
        .map_err(|e| PinError::BadUpload(e.to_string()))?;
    let form = reqwest::multipart::Form::new().part(FILE_FIELD, part);
    let request = state.http.post(pin_endpoint(&state.pinning_api_url, PIN_FILE_PATH)).multipart(form);
    let pinned = send_pin(request, creds).await?;
    tracing::info!(%file_name, size, hash = %pinned.ipfs_hash, "file pinned");
    Ok(Json(pinned))
}

/// `POST /api/pin/json`: pin a metadata document.
pub async fn pin_json(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(doc): Json<NftMetadata>,
) -> Result<Json<PinResponse>, PinError> {
    let creds = admit(&state, peer)?;
    let request = state.http.post(pin_endpoint(&state.pinning_api_url, PIN_JSON_PATH)).json(&pin_json_body(&doc));
    let pinned = send_pin(request, creds).await?;
    tracing::info!(hash = %pinned.ipfs_hash, "metadata pinned");
    Ok(Json(pinned))
}
