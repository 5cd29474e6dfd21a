//! Marketplace endpoint configuration.
//!
//! Native front ends read the process environment; the browser build resolves
//! the same variable names at compile time and passes them through
//! [`MarketConfig::from_lookup`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use solana_program::pubkey::Pubkey;

use crate::gateway::DEFAULT_GATEWAY_URL;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const RPC_URL_VAR: &str = "MARKET_RPC_URL";
pub const PROGRAM_ID_VAR: &str = "MARKET_PROGRAM_ID";
pub const GATEWAY_URL_VAR: &str = "MARKET_GATEWAY_URL";
pub const PINATA_API_KEY_VAR: &str = "PINATA_API_KEY";
pub const PINATA_SECRET_VAR: &str = "PINATA_SECRET_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    pub rpc_url: String,
    pub program_id: Pubkey,
    pub gateway_url: String,
}

impl MarketConfig {
    /// Build from environment variables.
    ///
    /// Required:
    /// - `MARKET_PROGRAM_ID`
    ///
    /// Optional:
    /// - `MARKET_RPC_URL`: default devnet
    /// - `MARKET_GATEWAY_URL`: default public pinning gateway
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the program id is missing or not a public key.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key-value source.
    ///
    /// # Errors
    ///
    /// See [`MarketConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let raw_program = non_empty(PROGRAM_ID_VAR).ok_or(ConfigError::Missing(PROGRAM_ID_VAR))?;
        let program_id = Pubkey::from_str(&raw_program)
            .map_err(|e| ConfigError::Invalid { var: PROGRAM_ID_VAR, reason: e.to_string() })?;
        let rpc_url = non_empty(RPC_URL_VAR).unwrap_or_else(|| DEFAULT_RPC_URL.to_owned());
        let gateway_url = non_empty(GATEWAY_URL_VAR)
            .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        Ok(Self { rpc_url, program_id, gateway_url })
    }
}

/// Pinning API key pair. Server and CLI only.
#[derive(Clone, PartialEq, Eq)]
pub struct PinningCredentials {
    pub api_key: String,
    pub secret_api_key: String,
}

impl std::fmt::Debug for PinningCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinningCredentials").field("api_key", &self.api_key).finish_non_exhaustive()
    }
}

impl PinningCredentials {
    /// Load from `PINATA_API_KEY` and `PINATA_SECRET_API_KEY`.
    /// Returns `None` if either is missing (pinning disabled).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = lookup(PINATA_API_KEY_VAR).filter(|v| !v.is_empty())?;
        let secret_api_key = lookup(PINATA_SECRET_VAR).filter(|v| !v.is_empty())?;
        Some(Self { api_key, secret_api_key })
    }
}
