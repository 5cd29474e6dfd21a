//! Metadata reads from the public gateway and uploads through the pinning
//! proxy.
//!
//! ERROR HANDLING
//! ==============
//! Failures become [`MarketError::Gateway`] with the HTTP status or transport
//! message. A failed read only blanks one card; a failed upload aborts the
//! listing before any transaction is built.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use async_trait::async_trait;
use market::MarketError;
use market::gateway::{MetadataSource, NftMetadata, PinResponse};

/// Unauthenticated HTTP GET against the configured gateway.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserGateway;

#[cfg(any(test, feature = "hydrate"))]
fn fetch_failed_message(url: &str, status: u16) -> String {
    format!("metadata fetch {url} failed: {status}")
}

#[cfg(any(test, feature = "hydrate"))]
fn pin_failed_message(status: u16) -> String {
    format!("pin request failed: {status}")
}

#[async_trait(?Send)]
impl MetadataSource for BrowserGateway {
    async fn fetch_metadata(&self, url: &str) -> Result<NftMetadata, MarketError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = gloo_net::http::Request::get(url)
                .send()
                .await
                .map_err(|e| MarketError::Gateway(e.to_string()))?;
            if !resp.ok() {
                return Err(MarketError::Gateway(fetch_failed_message(url, resp.status())));
            }
            resp.json::<NftMetadata>().await.map_err(|e| MarketError::Gateway(e.to_string()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = url;
            Err(MarketError::Gateway("gateway not available during server render".to_owned()))
        }
    }
}

#[cfg(feature = "hydrate")]
async fn read_pin_response(resp: gloo_net::http::Response) -> Result<PinResponse, MarketError> {
    if !resp.ok() {
        return Err(MarketError::Gateway(pin_failed_message(resp.status())));
    }
    resp.json::<PinResponse>().await.map_err(|e| MarketError::Gateway(e.to_string()))
}

/// Pin an image file via `POST /api/pin/file` (multipart field `file`).
///
/// # Errors
///
/// Returns [`MarketError::Gateway`] if the form cannot be built or the proxy
/// rejects the upload.
#[cfg(feature = "hydrate")]
pub async fn pin_file(file: &web_sys::File) -> Result<PinResponse, MarketError> {
    let js_err = |e: wasm_bindgen::JsValue| MarketError::Gateway(format!("{e:?}"));
    let form = web_sys::FormData::new().map_err(js_err)?;
    form.append_with_blob_and_filename("file", file, &file.name()).map_err(js_err)?;
    let resp = gloo_net::http::Request::post(crate::config::PIN_FILE_ENDPOINT)
        .body(form)
        .map_err(|e| MarketError::Gateway(e.to_string()))?
        .send()
        .await
        .map_err(|e| MarketError::Gateway(e.to_string()))?;
    read_pin_response(resp).await
}

/// Pin a metadata document via `POST /api/pin/json`.
///
/// # Errors
///
/// Returns [`MarketError::Gateway`] if the proxy rejects the document.
pub async fn pin_json(doc: &NftMetadata) -> Result<PinResponse, MarketError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(crate::config::PIN_JSON_ENDPOINT)
            .json(doc)
            .map_err(|e| MarketError::Gateway(e.to_string()))?
            .send()
            .await
            .map_err(|e| MarketError::Gateway(e.to_string()))?;
        read_pin_response(resp).await
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = doc;
        Err(MarketError::Gateway("pinning not available during server render".to_owned()))
    }
}

/// Pin `image`, then the draft document completed with its URL.
///
/// # Errors
///
/// Returns the first pinning failure.
#[cfg(feature = "hydrate")]
pub async fn upload_nft(
    image: &web_sys::File,
    draft: NftMetadata,
    gateway_url: &str,
) -> Result<market::gateway::PinnedNft, MarketError> {
    let image_pin = pin_file(image).await?;
    let doc = draft.with_image(&image_pin.ipfs_hash, &image.type_(), gateway_url);
    let doc_pin = pin_json(&doc).await?;
    Ok(market::gateway::PinnedNft { image_hash: image_pin.ipfs_hash, metadata_hash: doc_pin.ipfs_hash })
}
