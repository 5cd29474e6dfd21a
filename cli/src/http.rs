//! Native transports over `reqwest`: the cluster endpoint, the metadata
//! gateway, and direct uploads to the pinning API.
//!
//! ERROR HANDLING
//! ==============
//! Connection failures and non-2xx statuses are transport errors. A JSON-RPC
//! error object in a 2xx body is left to [`market::rpc::parse_response`], so
//! program rejections keep their logs. Pinning failures carry the upstream
//! status and body text.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use market::MarketError;
use market::config::PinningCredentials;
use market::gateway::{
    API_KEY_HEADER, MetadataSource, NftMetadata, PIN_FILE_PATH, PIN_JSON_PATH, PinResponse, PinnedNft, SECRET_KEY_HEADER,
    pin_endpoint, pin_json_body,
};
use market::rpc::{RpcError, RpcTransport, parse_response, request_body};
use serde_json::Value;

/// Multipart field name the pinning API reads the upload from.
const FILE_FIELD: &str = "file";

pub struct HttpRpc {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpRpc {
    #[must_use]
    pub fn new(http: reqwest::Client, url: &str) -> Self {
        Self { http, url: url.to_owned(), next_id: AtomicU64::new(1) }
    }
}

#[async_trait(?Send)]
impl RpcTransport for HttpRpc {
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let response = self
            .http
            .post(&self.url)
            .json(&request_body(id, method, params))
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Transport(format!("rpc endpoint returned HTTP {}", status.as_u16())));
        }
        let body: Value = response.json().await.map_err(|e| RpcError::Malformed(e.to_string()))?;
        parse_response(body)
    }
}

pub struct HttpGateway {
    http: reqwest::Client,
}

impl HttpGateway {
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait(?Send)]
impl MetadataSource for HttpGateway {
    async fn fetch_metadata(&self, url: &str) -> Result<NftMetadata, MarketError> {
        let response = self.http.get(url).send().await.map_err(|e| MarketError::Gateway(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::Gateway(format!("{url} returned HTTP {}", status.as_u16())));
        }
        response.json().await.map_err(|e| MarketError::Gateway(format!("{url}: {e}")))
    }
}

/// Uploads straight to the pinning API with the operator's key pair.
pub struct Pinner {
    http: reqwest::Client,
    credentials: PinningCredentials,
    api_url: String,
}

impl Pinner {
    #[must_use]
    pub fn new(http: reqwest::Client, credentials: PinningCredentials, api_url: &str) -> Self {
        Self { http, credentials, api_url: api_url.to_owned() }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<PinResponse, MarketError> {
        let response = request
            .header(API_KEY_HEADER, &self.credentials.api_key)
            .header(SECRET_KEY_HEADER, &self.credentials.secret_api_key)
            .send()
            .await
            .map_err(|e| MarketError::Gateway(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketError::Gateway(pin_failed_message(status.as_u16(), &body)));
        }
        response.json().await.map_err(|e| MarketError::Gateway(e.to_string()))
    }

    /// # Errors
    ///
    /// [`MarketError::Gateway`] on transport failure or upstream rejection.
    pub async fn pin_file(&self, file_name: &str, mime: &str, bytes: Vec<u8>) -> Result<PinResponse, MarketError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_owned())
            .mime_str(mime)
            .map_err(|e| MarketError::Gateway(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part(FILE_FIELD, part);
        let pinned = self.send(self.http.post(pin_endpoint(&self.api_url, PIN_FILE_PATH)).multipart(form)).await?;
        tracing::info!(%file_name, hash = %pinned.ipfs_hash, "file pinned");
        Ok(pinned)
    }

    /// # Errors
    ///
    /// [`MarketError::Gateway`] on transport failure or upstream rejection.
    pub async fn pin_json(&self, doc: &NftMetadata) -> Result<PinResponse, MarketError> {
        let pinned = self.send(self.http.post(pin_endpoint(&self.api_url, PIN_JSON_PATH)).json(&pin_json_body(doc))).await?;
        tracing::info!(hash = %pinned.ipfs_hash, "metadata pinned");
        Ok(pinned)
    }

    /// Pin the image, complete the draft with its URL, then pin the document.
    ///
    /// # Errors
    ///
    /// Stops at the first failed upload; an image pinned before a failed
    /// document upload stays pinned.
    pub async fn upload_nft(
        &self,
        image: &Path,
        bytes: Vec<u8>,
        draft: NftMetadata,
        gateway_url: &str,
    ) -> Result<PinnedNft, MarketError> {
        let file_name = image.file_name().and_then(|n| n.to_str()).unwrap_or("upload");
        let mime = guess_mime(image);
        let image_pin = self.pin_file(file_name, &mime, bytes).await?;
        let doc = draft.with_image(&image_pin.ipfs_hash, &mime, gateway_url);
        let doc_pin = self.pin_json(&doc).await?;
        Ok(PinnedNft { image_hash: image_pin.ipfs_hash, metadata_hash: doc_pin.ipfs_hash })
    }
}

fn pin_failed_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("pinning API returned HTTP {status}")
    } else {
        format!("pinning API returned HTTP {status}: {body}")
    }
}

/// Content type from the file extension; unknown types upload as bytes.
#[must_use]
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path).first_or_octet_stream().essence_str().to_owned()
}
