//! Crate-wide error type and the program error-code table.
//!
//! ERROR HANDLING
//! ==============
//! Three kinds of failure reach the UI: client-side precondition failures
//! (validation, missing wallet) raised before any network call, transport
//! failures, and remote program rejections. The last two arrive through the
//! same RPC error path; [`user_message`] recovers the program's custom error
//! code from the rejection text when present and maps it through
//! [`PROGRAM_ERRORS`], otherwise the caller's generic message is used.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::accounts::DecodeError;
use crate::rpc::RpcError;
use crate::transaction::TransactionError;
use crate::validation::ValidationError;

/// Errors produced by marketplace operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MarketError {
    /// A form value failed client-side validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A mutating operation was attempted without a connected wallet.
    #[error("wallet not connected")]
    WalletNotConnected,

    /// The RPC endpoint was unreachable, answered malformed data, or rejected the request.
    #[error("rpc request failed: {0}")]
    Rpc(#[from] RpcError),

    /// On-chain account data did not match the expected layout.
    #[error("account decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// A transaction could not be encoded or the wallet returned unreadable bytes.
    #[error("transaction encoding failed: {0}")]
    Transaction(#[from] TransactionError),

    /// Instruction arguments could not be serialized.
    #[error("instruction encoding failed: {0}")]
    Encode(String),

    /// The wallet refused or failed to sign.
    #[error("wallet signing failed: {0}")]
    Signer(String),

    /// The content gateway could not be reached or returned unusable data.
    #[error("gateway request failed: {0}")]
    Gateway(String),

    /// The transaction landed but the program rejected it; `error` is the
    /// node's raw error JSON.
    #[error("transaction {signature} failed: {error}")]
    Rejected { signature: String, error: String },
}

impl MarketError {
    /// Stable machine-readable code for structured logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::WalletNotConnected => "E_WALLET_NOT_CONNECTED",
            Self::Rpc(RpcError::Remote { .. }) => "E_RPC_REMOTE",
            Self::Rpc(_) => "E_RPC",
            Self::Decode(_) => "E_DECODE",
            Self::Encode(_) => "E_ENCODE",
            Self::Transaction(_) => "E_TRANSACTION",
            Self::Signer(_) => "E_SIGNER",
            Self::Gateway(_) => "E_GATEWAY",
            Self::Rejected { .. } => "E_REJECTED",
        }
    }
}

/// Custom error codes returned by the marketplace program.
pub const PROGRAM_ERRORS: &[(u32, &str)] = &[
    (6000, "The name shouldn't be empty or exceed 32 characters."),
    (6001, "The fee cannot exceed 10,000 basis points (100%)."),
    (6002, "The listing price must be greater than zero."),
    (6003, "The listing owner does not match the signer."),
];

/// Look up the human message for a program error code.
#[must_use]
pub fn program_error_message(code: u32) -> Option<&'static str> {
    PROGRAM_ERRORS.iter().find(|(c, _)| *c == code).map(|(_, msg)| *msg)
}

/// Extract a custom program error code from RPC error text or simulation logs.
///
/// Recognizes the three shapes validators emit:
/// `custom program error: 0x1771`, `{"Custom":6001}`, and Anchor's
/// `Error Number: 6001.` log line.
#[must_use]
pub fn program_error_code(text: &str) -> Option<u32> {
    if let Some(idx) = text.find("custom program error: 0x") {
        let hex: String = text[idx + "custom program error: 0x".len()..]
            .chars()
            .take_while(char::is_ascii_hexdigit)
            .collect();
        if let Ok(code) = u32::from_str_radix(&hex, 16) {
            return Some(code);
        }
    }
    for marker in ["\"Custom\":", "Error Number: "] {
        if let Some(idx) = text.find(marker) {
            let digits: String = text[idx + marker.len()..]
                .trim_start()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            if let Ok(code) = digits.parse() {
                return Some(code);
            }
        }
    }
    None
}

/// User-facing text for a failed operation.
///
/// `fallback` is the action-specific generic message ("Failed to list NFT").
#[must_use]
pub fn user_message(err: &MarketError, fallback: &str) -> String {
    match err {
        MarketError::Validation(v) => v.to_string(),
        MarketError::WalletNotConnected => "Please connect your wallet.".to_owned(),
        MarketError::Rpc(RpcError::Remote { message, logs, .. }) => std::iter::once(message.as_str())
            .chain(logs.iter().map(String::as_str))
            .find_map(program_error_code)
            .and_then(program_error_message)
            .map_or_else(|| fallback.to_owned(), str::to_owned),
        MarketError::Rejected { error, .. } => program_error_code(error)
            .and_then(program_error_message)
            .map_or_else(|| fallback.to_owned(), str::to_owned),
        _ => fallback.to_owned(),
    }
}
