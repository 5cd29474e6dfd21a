//! Keypair-file signer.
//!
//! The file format is the JSON byte array written by the cluster's keygen
//! tool: 64 numbers, the 32-byte secret followed by the 32-byte public key.

#[cfg(test)]
#[path = "keypair_test.rs"]
mod keypair_test;

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use market::signer::WalletSigner;
use market::transaction::Transaction;
use market::{MarketError, Pubkey};
use solana_keypair::{Keypair, read_keypair, read_keypair_file};
use solana_signer::Signer as _;

const SELF_CHECK: &[u8] = b"nft-market keypair check";

#[derive(Debug, thiserror::Error)]
pub enum KeypairError {
    #[error("cannot read keypair file {path}: {message}")]
    Read { path: String, message: String },
    #[error("invalid keypair: {0}")]
    Invalid(String),
    #[error("public key does not match secret key")]
    Mismatch,
}

pub struct KeypairSigner {
    keypair: Keypair,
}

impl fmt::Debug for KeypairSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeypairSigner").field("pubkey", &self.keypair.pubkey()).finish_non_exhaustive()
    }
}

impl KeypairSigner {
    /// # Errors
    ///
    /// Returns [`KeypairError`] if the file is unreadable or malformed.
    pub fn from_file(path: &Path) -> Result<Self, KeypairError> {
        let keypair = read_keypair_file(path)
            .map_err(|e| KeypairError::Read { path: path.display().to_string(), message: e.to_string() })?;
        Self::checked(keypair)
    }

    /// # Errors
    ///
    /// Returns [`KeypairError`] for anything but a 64-byte array whose public
    /// half matches its secret half.
    pub fn from_json(text: &str) -> Result<Self, KeypairError> {
        let keypair = read_keypair(&mut text.as_bytes()).map_err(|e| KeypairError::Invalid(e.to_string()))?;
        Self::checked(keypair)
    }

    /// A file whose public half was edited still loads, but every signature
    /// it makes would be rejected by the cluster.
    fn checked(keypair: Keypair) -> Result<Self, KeypairError> {
        let signature = keypair.sign_message(SELF_CHECK);
        if !signature.verify(keypair.pubkey().as_ref(), SELF_CHECK) {
            return Err(KeypairError::Mismatch);
        }
        Ok(Self { keypair })
    }
}

#[async_trait(?Send)]
impl WalletSigner for KeypairSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_transaction(&self, mut tx: Transaction) -> Result<Transaction, MarketError> {
        let blockhash = tx.message.recent_blockhash;
        tx.try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|e| MarketError::Signer(e.to_string()))?;
        Ok(tx)
    }
}
