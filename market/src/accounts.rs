//! Decoders for the marketplace program's accounts.
//!
//! Both account types use the Anchor layout: an 8-byte type discriminator
//! (`sha256("account:<Name>")[..8]`) followed by borsh fields. Accounts may
//! carry trailing allocation padding, so decoding reads fields from the front
//! and ignores whatever follows.

#[cfg(test)]
#[path = "accounts_test.rs"]
mod accounts_test;

use borsh::BorshDeserialize;
use sha2::{Digest, Sha256};
use solana_program::pubkey::Pubkey;

use crate::rpc::RpcFilter;

/// Byte offset of `Listing.maker`; used for the seller memcmp filter.
pub const LISTING_MAKER_OFFSET: usize = 8;
const DISCRIMINATOR_LEN: usize = 8;

/// Error returned by account decoders.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("account data too short ({0} bytes)")]
    TooShort(usize),
    #[error("account discriminator does not match {0}")]
    Discriminator(&'static str),
    #[error("malformed {account} fields: {reason}")]
    Fields { account: &'static str, reason: String },
}

/// Anchor account-type discriminator.
#[must_use]
pub fn account_discriminator(name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("account:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

fn strip_discriminator<'a>(data: &'a [u8], name: &'static str) -> Result<&'a [u8], DecodeError> {
    if data.len() < DISCRIMINATOR_LEN {
        return Err(DecodeError::TooShort(data.len()));
    }
    if data[..DISCRIMINATOR_LEN] != account_discriminator(name) {
        return Err(DecodeError::Discriminator(name));
    }
    Ok(&data[DISCRIMINATOR_LEN..])
}

fn read_fields<T: BorshDeserialize>(mut body: &[u8], account: &'static str) -> Result<T, DecodeError> {
    T::deserialize(&mut body).map_err(|e| DecodeError::Fields { account, reason: e.to_string() })
}

#[derive(BorshDeserialize)]
struct RawListing {
    maker: [u8; 32],
    nft_mint: [u8; 32],
    price: u64,
    metadata: String,
    bump: u8,
}

/// One NFT offered for sale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingAccount {
    pub maker: Pubkey,
    pub nft_mint: Pubkey,
    /// Price in lamports.
    pub price: u64,
    /// Content hash or URL of the off-chain metadata JSON.
    pub metadata: String,
    pub bump: u8,
}

impl ListingAccount {
    pub const NAME: &'static str = "Listing";

    /// # Errors
    ///
    /// Returns a [`DecodeError`] for short data, a foreign discriminator, or malformed fields.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let raw: RawListing = read_fields(strip_discriminator(data, Self::NAME)?, Self::NAME)?;
        Ok(Self {
            maker: Pubkey::new_from_array(raw.maker),
            nft_mint: Pubkey::new_from_array(raw.nft_mint),
            price: raw.price,
            metadata: raw.metadata,
            bump: raw.bump,
        })
    }
}

#[derive(BorshDeserialize)]
struct RawMarketplace {
    authority: [u8; 32],
    fee_bps: u16,
    marketplace_bump: u8,
    treasury: [u8; 32],
    treasury_bump: u8,
    name: String,
}

/// Global marketplace configuration; one per program deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketplaceAccount {
    pub authority: Pubkey,
    pub fee_bps: u16,
    pub marketplace_bump: u8,
    pub treasury: Pubkey,
    pub treasury_bump: u8,
    pub name: String,
}

impl MarketplaceAccount {
    pub const NAME: &'static str = "Marketplace";

    /// # Errors
    ///
    /// Returns a [`DecodeError`] for short data, a foreign discriminator, or malformed fields.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let raw: RawMarketplace = read_fields(strip_discriminator(data, Self::NAME)?, Self::NAME)?;
        Ok(Self {
            authority: Pubkey::new_from_array(raw.authority),
            fee_bps: raw.fee_bps,
            marketplace_bump: raw.marketplace_bump,
            treasury: Pubkey::new_from_array(raw.treasury),
            treasury_bump: raw.treasury_bump,
            name: raw.name,
        })
    }

    /// Fee as a percentage, e.g. `250` bps -> `2.5`.
    #[must_use]
    pub fn fee_percent(&self) -> f64 {
        f64::from(self.fee_bps) / 100.0
    }
}

/// `getProgramAccounts` filters selecting listing accounts, optionally by seller.
#[must_use]
pub fn listing_filters(seller: Option<&Pubkey>) -> Vec<RpcFilter> {
    let mut filters = vec![RpcFilter::Memcmp {
        offset: 0,
        bytes: account_discriminator(ListingAccount::NAME).to_vec(),
    }];
    if let Some(seller) = seller {
        filters.push(RpcFilter::Memcmp { offset: LISTING_MAKER_OFFSET, bytes: seller.to_bytes().to_vec() });
    }
    filters
}
