//! Wallet capability used by mutating operations.

use async_trait::async_trait;
use solana_program::pubkey::Pubkey;

use crate::error::MarketError;
use crate::transaction::Transaction;

/// Something that holds a private key and can sign transactions for it.
///
/// The browser implementation forwards to a wallet extension and may suspend
/// on user approval, so futures are not required to be `Send`.
#[async_trait(?Send)]
pub trait WalletSigner {
    fn pubkey(&self) -> Pubkey;

    /// Sign `tx` and return it with the signer's slot filled.
    async fn sign_transaction(&self, tx: Transaction) -> Result<Transaction, MarketError>;

    /// Sign several transactions in one approval where the wallet supports it.
    async fn sign_all_transactions(&self, txs: Vec<Transaction>) -> Result<Vec<Transaction>, MarketError> {
        let mut signed = Vec::with_capacity(txs.len());
        for tx in txs {
            signed.push(self.sign_transaction(tx).await?);
        }
        Ok(signed)
    }
}
