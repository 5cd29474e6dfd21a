//! JSON-RPC over `fetch`.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "rpc_test.rs"]
mod rpc_test;

use std::cell::Cell;

use async_trait::async_trait;
use market::rpc::{RpcError, RpcTransport};
use serde_json::Value;

/// Cluster endpoint reached with `gloo-net`.
pub struct BrowserRpc {
    url: String,
    next_id: Cell<u64>,
}

impl BrowserRpc {
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self { url: url.to_owned(), next_id: Cell::new(1) }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn take_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        id
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn http_status_message(status: u16) -> String {
    format!("rpc endpoint returned HTTP {status}")
}

#[async_trait(?Send)]
impl RpcTransport for BrowserRpc {
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.take_id();
        #[cfg(feature = "hydrate")]
        {
            let body = market::rpc::request_body(id, method, params);
            let resp = gloo_net::http::Request::post(&self.url)
                .json(&body)
                .map_err(|e| RpcError::Transport(e.to_string()))?
                .send()
                .await
                .map_err(|e| RpcError::Transport(e.to_string()))?;
            if !resp.ok() {
                return Err(RpcError::Transport(http_status_message(resp.status())));
            }
            let value: Value = resp.json().await.map_err(|e| RpcError::Malformed(e.to_string()))?;
            market::rpc::parse_response(value)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (id, method, params);
            Err(RpcError::Transport("rpc not available during server render".to_owned()))
        }
    }
}
