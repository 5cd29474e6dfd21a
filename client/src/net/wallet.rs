//! Wallet extension bridge.
//!
//! SYSTEM CONTEXT
//! ==============
//! The injected provider is a JS object, so signing goes through
//! `wallet_bridge.js`. Only the base58 message crosses the boundary, in the
//! provider's `signTransaction` request form; the returned signature is
//! placed into the transaction here, so the page loads no JS chain library.
//! Signing several transactions prompts once per transaction.
//!
//! ERROR HANDLING
//! ==============
//! A rejected approval or a missing extension surfaces as
//! [`MarketError::Signer`]; the acting component resets its in-flight flag.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "wallet_test.rs"]
mod wallet_test;

use async_trait::async_trait;
use market::signer::WalletSigner;
use market::transaction::{self, Transaction};
use market::{MarketError, Pubkey};

#[cfg(feature = "hydrate")]
mod bridge {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(module = "/src/net/wallet_bridge.js")]
    extern "C" {
        #[wasm_bindgen(js_name = walletAvailable)]
        pub fn wallet_available() -> bool;

        #[wasm_bindgen(catch, js_name = walletConnect)]
        pub async fn wallet_connect(only_if_trusted: bool) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(catch, js_name = walletDisconnect)]
        pub async fn wallet_disconnect() -> Result<JsValue, JsValue>;

        #[wasm_bindgen(catch, js_name = walletSignMessage)]
        pub async fn wallet_sign_message(message: &str) -> Result<JsValue, JsValue>;
    }

    /// Best-effort text for a thrown JS value.
    pub fn error_text(err: &JsValue) -> String {
        err.dyn_ref::<js_sys::Error>()
            .map(|e| String::from(e.message()))
            .or_else(|| err.as_string())
            .unwrap_or_else(|| format!("{err:?}"))
    }
}

/// Parse the base58 key string returned by the provider.
///
/// # Errors
///
/// Returns a message if the provider handed back something that is not a
/// public key.
pub fn parse_wallet_key(text: &str) -> Result<Pubkey, String> {
    text.trim().parse::<Pubkey>().map_err(|e| format!("wallet returned invalid key: {e}"))
}

/// Whether a wallet extension is injected into the page.
pub fn is_available() -> bool {
    #[cfg(feature = "hydrate")]
    {
        bridge::wallet_available()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        false
    }
}

/// Ask the extension to connect. With `only_if_trusted` the request succeeds
/// silently for a previously approved site and fails otherwise.
///
/// # Errors
///
/// Returns the provider's message when the user rejects the request or no
/// extension is present.
pub async fn connect(only_if_trusted: bool) -> Result<Pubkey, String> {
    #[cfg(feature = "hydrate")]
    {
        let value = bridge::wallet_connect(only_if_trusted).await.map_err(|e| bridge::error_text(&e))?;
        let text = value.as_string().ok_or_else(|| "wallet returned no key".to_owned())?;
        parse_wallet_key(&text)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = only_if_trusted;
        Err("wallet not available during server render".to_owned())
    }
}

pub async fn disconnect() {
    #[cfg(feature = "hydrate")]
    {
        if let Err(e) = bridge::wallet_disconnect().await {
            log::warn!("wallet disconnect failed: {}", bridge::error_text(&e));
        }
    }
}

/// Signer backed by the connected extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrowserWallet {
    pubkey: Pubkey,
}

impl BrowserWallet {
    #[must_use]
    pub fn new(pubkey: Pubkey) -> Self {
        Self { pubkey }
    }
}

/// Fill `pubkey`'s slot of `tx` with the base58 signature a provider
/// returned for [`transaction::message_base58`].
///
/// # Errors
///
/// Returns [`MarketError::Transaction`] for an unreadable signature or a
/// key that is not a signer of `tx`.
pub fn apply_wallet_signature(mut tx: Transaction, pubkey: &Pubkey, signature: &str) -> Result<Transaction, MarketError> {
    let signature = transaction::parse_signature(signature)?;
    transaction::set_signature(&mut tx, pubkey, signature)?;
    Ok(tx)
}

#[async_trait(?Send)]
impl WalletSigner for BrowserWallet {
    fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    async fn sign_transaction(&self, tx: Transaction) -> Result<Transaction, MarketError> {
        #[cfg(feature = "hydrate")]
        {
            let value = bridge::wallet_sign_message(&transaction::message_base58(&tx))
                .await
                .map_err(|e| MarketError::Signer(bridge::error_text(&e)))?;
            let text = value
                .as_string()
                .ok_or_else(|| MarketError::Signer("wallet returned no signature".to_owned()))?;
            apply_wallet_signature(tx, &self.pubkey, &text)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = tx;
            Err(MarketError::Signer("wallet not available during server render".to_owned()))
        }
    }
}
