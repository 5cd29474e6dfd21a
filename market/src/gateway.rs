//! Off-chain NFT metadata and the content-addressed file gateway.
//!
//! Listings store a pointer to their metadata document: either a bare content
//! hash, an `ipfs://` URI, or an absolute URL. [`metadata_url`] resolves all
//! three against the configured gateway. Uploads go through the pinning API,
//! whose key pair is held by the server or CLI and never shipped to browsers.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MarketError;

pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.pinata.cloud";
pub const PINNING_API_URL: &str = "https://api.pinata.cloud";
pub const PIN_FILE_PATH: &str = "pinning/pinFileToIPFS";
pub const PIN_JSON_PATH: &str = "pinning/pinJSONToIPFS";
pub const API_KEY_HEADER: &str = "pinata_api_key";
pub const SECRET_KEY_HEADER: &str = "pinata_secret_api_key";

/// Pin name used when a metadata document has no name of its own.
pub const DEFAULT_PIN_NAME: &str = "nft-metadata";

const IPFS_SCHEME: &str = "ipfs://";

/// Fetches metadata documents by URL.
#[async_trait(?Send)]
pub trait MetadataSource {
    async fn fetch_metadata(&self, url: &str) -> Result<NftMetadata, MarketError>;
}

/// Gateway URL serving the content with hash `hash`.
#[must_use]
pub fn ipfs_url(gateway: &str, hash: &str) -> String {
    format!("{}/ipfs/{}", gateway.trim_end_matches('/'), hash.trim())
}

/// Resolve a listing's metadata pointer to a fetchable URL.
#[must_use]
pub fn metadata_url(gateway: &str, pointer: &str) -> String {
    let pointer = pointer.trim();
    if pointer.starts_with("https://") || pointer.starts_with("http://") {
        return pointer.to_owned();
    }
    ipfs_url(gateway, pointer.strip_prefix(IPFS_SCHEME).unwrap_or(pointer))
}

/// Full URL of a pinning endpoint.
#[must_use]
pub fn pin_endpoint(api_base: &str, path: &str) -> String {
    format!("{}/{}", api_base.trim_end_matches('/'), path)
}

/// Body for the JSON pinning endpoint: the document plus a display name.
#[must_use]
pub fn pin_json_body(doc: &NftMetadata) -> serde_json::Value {
    let name = doc.name.as_deref().map(str::trim).filter(|n| !n.is_empty()).unwrap_or(DEFAULT_PIN_NAME);
    serde_json::json!({
        "pinataContent": doc,
        "pinataMetadata": { "name": name },
    })
}

/// Trait value: metadata documents mix strings and numbers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: AttributeValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    pub uri: String,
    #[serde(rename = "type")]
    pub mime: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub files: Vec<FileRef>,
    #[serde(default)]
    pub category: String,
}

/// Off-chain metadata JSON. Every field is optional on read; documents in the
/// wild are loosely shaped and nothing beyond these fields is interpreted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

impl NftMetadata {
    /// Complete a draft document once its image has been pinned: the image
    /// URL, a single `properties.files` entry, and `category = "image"`.
    #[must_use]
    pub fn with_image(mut self, image_hash: &str, mime: &str, gateway: &str) -> Self {
        let url = ipfs_url(gateway, image_hash);
        self.image = Some(url.clone());
        self.properties = Some(Properties {
            files: vec![FileRef { uri: url, mime: mime.to_owned() }],
            category: "image".to_owned(),
        });
        self
    }
}

/// Pinning API response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    #[serde(rename = "PinSize")]
    pub pin_size: u64,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

/// Content hashes of an uploaded image and its metadata document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedNft {
    pub image_hash: String,
    pub metadata_hash: String,
}
