//! Legacy transactions for the marketplace.
//!
//! Transactions are `solana_transaction::Transaction`. This module compiles
//! them with the fee payer first, fills a single signer's slot with a
//! signature produced elsewhere (a wallet extension signs the message bytes,
//! not the transaction object), and moves them across the RPC boundary in
//! their bincode wire form.

#[cfg(test)]
#[path = "transaction_test.rs"]
mod transaction_test;

use base64::Engine as _;
use solana_program::hash::Hash;
use solana_program::instruction::Instruction;
use solana_program::message::Message;
use solana_program::pubkey::Pubkey;

pub use solana_signature::Signature;
pub use solana_transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransactionError {
    #[error("malformed transaction: {0}")]
    Wire(String),
    #[error("signature count {found} does not match required signers {required}")]
    SignatureCount { found: usize, required: usize },
    #[error("{0} is not a required signer")]
    NotSigner(Pubkey),
    #[error("invalid base64: {0}")]
    Base64(String),
    #[error("invalid signature: {0}")]
    Signature(String),
}

/// Compile `instructions` with `payer` as fee payer; every signature slot
/// starts empty.
#[must_use]
pub fn new_unsigned(instructions: &[Instruction], payer: &Pubkey, recent_blockhash: &Hash) -> Transaction {
    Transaction::new_unsigned(Message::new_with_blockhash(instructions, Some(payer), recent_blockhash))
}

/// Required signer keys, in signature-slot order.
#[must_use]
pub fn signer_keys(tx: &Transaction) -> &[Pubkey] {
    let required = usize::from(tx.message.header.num_required_signatures);
    &tx.message.account_keys[..required.min(tx.message.account_keys.len())]
}

/// Place `signature` in the slot belonging to `signer`.
///
/// # Errors
///
/// Returns [`TransactionError::NotSigner`] if `signer` is not a required
/// signer of the message.
pub fn set_signature(tx: &mut Transaction, signer: &Pubkey, signature: Signature) -> Result<(), TransactionError> {
    let index = signer_keys(tx)
        .iter()
        .position(|k| k == signer)
        .ok_or(TransactionError::NotSigner(*signer))?;
    let found = tx.signatures.len();
    let slot = tx
        .signatures
        .get_mut(index)
        .ok_or(TransactionError::SignatureCount { found, required: index + 1 })?;
    *slot = signature;
    Ok(())
}

/// Base58 of the message bytes every signer signs. Wallet providers take
/// this form in a `signTransaction` request.
#[must_use]
pub fn message_base58(tx: &Transaction) -> String {
    bs58::encode(tx.message_data()).into_string()
}

/// # Errors
///
/// Returns [`TransactionError::Signature`] unless `text` is a base58
/// 64-byte signature.
pub fn parse_signature(text: &str) -> Result<Signature, TransactionError> {
    text.trim()
        .parse::<Signature>()
        .map_err(|e| TransactionError::Signature(e.to_string()))
}

/// Base58 transaction id (the fee payer's signature), once signed.
#[must_use]
pub fn signature_id(tx: &Transaction) -> Option<String> {
    tx.signatures
        .first()
        .filter(|s| **s != Signature::default())
        .map(ToString::to_string)
}

/// # Errors
///
/// Returns [`TransactionError::Wire`] if bincode cannot encode the transaction.
pub fn to_bytes(tx: &Transaction) -> Result<Vec<u8>, TransactionError> {
    bincode::serialize(tx).map_err(|e| TransactionError::Wire(e.to_string()))
}

/// Parse wire bytes, e.g. a transaction read back from a log or a node.
///
/// # Errors
///
/// Returns an error for undecodable input or a signature count that does
/// not match the message header.
pub fn from_bytes(bytes: &[u8]) -> Result<Transaction, TransactionError> {
    let tx: Transaction = bincode::deserialize(bytes).map_err(|e| TransactionError::Wire(e.to_string()))?;
    let required = usize::from(tx.message.header.num_required_signatures);
    if tx.signatures.len() != required {
        return Err(TransactionError::SignatureCount { found: tx.signatures.len(), required });
    }
    Ok(tx)
}

/// # Errors
///
/// See [`to_bytes`].
pub fn to_base64(tx: &Transaction) -> Result<String, TransactionError> {
    Ok(base64::engine::general_purpose::STANDARD.encode(to_bytes(tx)?))
}

/// # Errors
///
/// Returns an error for invalid base64 or malformed transaction bytes.
pub fn from_base64(encoded: &str) -> Result<Transaction, TransactionError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| TransactionError::Base64(e.to_string()))?;
    from_bytes(&bytes)
}
