//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds one pooled HTTP client for the pinning API, the optional
//! pinning credentials, and the per-address limiter guarding the pin
//! routes. The credentials never leave this process.

use std::sync::Arc;
use std::time::Duration;

use market::config::PinningCredentials;

use crate::config::ServerConfig;
use crate::rate_limit::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub pinning: Option<Arc<PinningCredentials>>,
    pub pinning_api_url: Arc<str>,
    pub pin_limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: reqwest::Client, config: ServerConfig) -> Self {
        Self {
            http,
            pinning: config.pinning.map(Arc::new),
            pinning_api_url: Arc::from(config.pinning_api_url),
            pin_limiter: RateLimiter::new(config.pin_rate_limit, Duration::from_secs(config.pin_rate_window_secs)),
        }
    }
}
