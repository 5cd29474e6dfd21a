//! Server configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use market::config::PinningCredentials;
use market::gateway::PINNING_API_URL;

use crate::rate_limit::{DEFAULT_PIN_LIMIT, DEFAULT_PIN_WINDOW_SECS};

pub const DEFAULT_PORT: u16 = 3000;
pub const PORT_VAR: &str = "PORT";
pub const PINNING_API_URL_VAR: &str = "PINATA_API_URL";
pub const PIN_RATE_LIMIT_VAR: &str = "PIN_RATE_LIMIT";
pub const PIN_RATE_WINDOW_VAR: &str = "PIN_RATE_LIMIT_WINDOW_SECS";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServerConfigError {
    #[error("invalid {var}: {value}")]
    InvalidPort { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Pinning API key pair; uploads answer 503 without it.
    pub pinning: Option<PinningCredentials>,
    pub pinning_api_url: String,
    /// Pin requests allowed per client address per window.
    pub pin_rate_limit: usize,
    pub pin_rate_window_secs: u64,
}

impl ServerConfig {
    /// Build from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `PINATA_API_KEY` + `PINATA_SECRET_API_KEY`: enable `/api/pin/*`
    /// - `PINATA_API_URL`: default public pinning API
    /// - `PIN_RATE_LIMIT` / `PIN_RATE_LIMIT_WINDOW_SECS`: default 20 per 60s;
    ///   unparsable values fall back to the defaults
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerConfigError> {
        let port = match lookup(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ServerConfigError::InvalidPort { var: PORT_VAR, value: raw })?,
            None => DEFAULT_PORT,
        };
        let pinning = PinningCredentials::from_lookup(&lookup);
        let pinning_api_url = lookup(PINNING_API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| PINNING_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        Ok(Self {
            port,
            pinning,
            pinning_api_url,
            pin_rate_limit: parse_or(&lookup, PIN_RATE_LIMIT_VAR, DEFAULT_PIN_LIMIT),
            pin_rate_window_secs: parse_or(&lookup, PIN_RATE_WINDOW_VAR, DEFAULT_PIN_WINDOW_SECS),
        })
    }
}

fn parse_or<T: std::str::FromStr>(lookup: impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key).and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}
