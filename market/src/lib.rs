//! Shared marketplace domain model for the browser client, server, and CLI.
//!
//! This crate owns everything that must be computed identically by every
//! front end talking to the on-chain marketplace program: account-address
//! derivation, instruction encoding, account decoding, the transaction wire
//! format, and the JSON-RPC envelope. Network access is abstracted behind the
//! [`rpc::RpcTransport`], [`gateway::MetadataSource`], and
//! [`signer::WalletSigner`] traits so the same code runs in the browser
//! (`gloo-net` + wallet extension) and natively (`reqwest` + keypair file).

pub mod accounts;
pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
pub mod instructions;
pub mod listings;
pub mod pda;
pub mod query;
pub mod rpc;
pub mod service;
pub mod signer;
pub mod token_metadata;
pub mod transaction;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::MarketError;
pub use solana_program::hash::Hash;
pub use solana_program::pubkey::Pubkey;
