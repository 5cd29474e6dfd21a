//! Wallet connection lifecycle.
//!
//! SYSTEM CONTEXT
//! ==============
//! The navbar drives connect/disconnect; every page gates on
//! [`WalletState::is_connected`]. Only the public key is stored here. Signing
//! goes through `net::wallet::BrowserWallet`, which is rebuilt from the key
//! for each action.

#[cfg(test)]
#[path = "wallet_test.rs"]
mod wallet_test;

use market::Pubkey;
use market::format::shorten_address;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletState {
    pub pubkey: Option<Pubkey>,
    pub connecting: bool,
    pub error: Option<String>,
}

impl WalletState {
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.pubkey.is_some()
    }

    pub fn begin_connect(&mut self) {
        self.connecting = true;
        self.error = None;
    }

    pub fn connected(&mut self, pubkey: Pubkey) {
        self.pubkey = Some(pubkey);
        self.connecting = false;
        self.error = None;
    }

    pub fn connect_failed(&mut self, message: String) {
        self.pubkey = None;
        self.connecting = false;
        self.error = Some(message);
    }

    pub fn disconnected(&mut self) {
        *self = Self::default();
    }

    /// Text for the navbar wallet button.
    #[must_use]
    pub fn button_label(&self) -> String {
        if self.connecting {
            return "Connecting...".to_owned();
        }
        match self.pubkey {
            Some(key) => shorten_address(&key.to_string(), 4),
            None => "Connect Wallet".to_owned(),
        }
    }
}
