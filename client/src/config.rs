//! Build-time endpoint configuration for the browser bundle.
//!
//! The bundle cannot read the server's environment, so the same variable
//! names are captured when the WASM is compiled. Pinning credentials are
//! deliberately absent; uploads go through the server's `/api/pin` proxy.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use market::config::{ConfigError, GATEWAY_URL_VAR, MarketConfig, PROGRAM_ID_VAR, RPC_URL_VAR};

/// Same-origin pinning proxy served by the `server` crate.
pub const PIN_FILE_ENDPOINT: &str = "/api/pin/file";
pub const PIN_JSON_ENDPOINT: &str = "/api/pin/json";

/// Poll interval for listing refreshes.
pub const LISTINGS_POLL_SECS: u64 = 30;

/// Signature status checks after a write, and the gap between them.
pub const CONFIRM_ATTEMPTS: u32 = 20;
pub const CONFIRM_POLL_MS: u64 = 1500;

fn build_time_var(key: &str) -> Option<String> {
    let value = match key {
        RPC_URL_VAR => option_env!("MARKET_RPC_URL"),
        PROGRAM_ID_VAR => option_env!("MARKET_PROGRAM_ID"),
        GATEWAY_URL_VAR => option_env!("MARKET_GATEWAY_URL"),
        _ => None,
    };
    value.map(str::to_owned)
}

/// Endpoint configuration captured at compile time.
///
/// # Errors
///
/// Returns [`ConfigError`] if `MARKET_PROGRAM_ID` was not set, or was not a
/// valid public key, when the bundle was built.
pub fn load() -> Result<MarketConfig, ConfigError> {
    MarketConfig::from_lookup(build_time_var)
}
