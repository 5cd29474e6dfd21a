//! Reader for the token-metadata program's per-mint metadata account.
//!
//! Only the leading fields are read: `key`, update authority, mint, then the
//! borsh strings `name`, `symbol`, `uri`. The program pads those strings with
//! NUL bytes to fixed widths, so they are trimmed after decoding.

#[cfg(test)]
#[path = "token_metadata_test.rs"]
mod token_metadata_test;

use borsh::BorshDeserialize;
use solana_program::pubkey::Pubkey;

use crate::accounts::DecodeError;

/// `Key::MetadataV1` tag in the first byte.
pub const METADATA_V1_KEY: u8 = 4;
const ACCOUNT: &str = "TokenMetadata";

#[derive(BorshDeserialize)]
struct RawTokenMetadata {
    key: u8,
    update_authority: [u8; 32],
    mint: [u8; 32],
    name: String,
    symbol: String,
    uri: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenMetadata {
    pub update_authority: Pubkey,
    pub mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
}

impl TokenMetadata {
    /// # Errors
    ///
    /// Returns [`DecodeError::Discriminator`] if the account is not a v1
    /// metadata account and [`DecodeError::Fields`] for truncated data.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut body = data;
        let raw = RawTokenMetadata::deserialize(&mut body)
            .map_err(|e| DecodeError::Fields { account: ACCOUNT, reason: e.to_string() })?;
        if raw.key != METADATA_V1_KEY {
            return Err(DecodeError::Discriminator(ACCOUNT));
        }
        Ok(Self {
            update_authority: Pubkey::new_from_array(raw.update_authority),
            mint: Pubkey::new_from_array(raw.mint),
            name: trim_padding(&raw.name),
            symbol: trim_padding(&raw.symbol),
            uri: trim_padding(&raw.uri),
        })
    }
}

fn trim_padding(s: &str) -> String {
    s.trim_end_matches('\0').trim().to_owned()
}
