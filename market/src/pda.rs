//! Program-derived account addresses.
//!
//! Every client that wants to talk to the same deployment must derive these
//! byte-for-byte identically. A mismatch is never detected locally: the
//! instruction simply targets the wrong account and the validator rejects it.

#[cfg(test)]
#[path = "pda_test.rs"]
mod pda_test;

use solana_program::pubkey::Pubkey;

pub const MARKETPLACE_SEED: &[u8] = b"marketplace";
pub const TREASURY_SEED: &[u8] = b"treasury";
pub const LISTING_SEED: &[u8] = b"listing";
pub const VAULT_SEED: &[u8] = b"vault";
pub const METADATA_SEED: &[u8] = b"metadata";
pub const EDITION_SEED: &[u8] = b"edition";

/// Token-metadata program. Metadata and master-edition addresses are derived
/// under this id, not under the marketplace program.
pub const METADATA_PROGRAM_ID: Pubkey = solana_program::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
pub const TOKEN_PROGRAM_ID: Pubkey = solana_program::pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
    solana_program::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");
pub const SYSTEM_PROGRAM_ID: Pubkey = solana_program::system_program::ID;

/// Global marketplace configuration account.
#[must_use]
pub fn marketplace_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[MARKETPLACE_SEED], program_id).0
}

/// Fee sink owned by the marketplace program.
#[must_use]
pub fn treasury_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[TREASURY_SEED], program_id).0
}

/// Listing record for one mint. Exists only while the mint is listed.
#[must_use]
pub fn listing_address(program_id: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[LISTING_SEED, mint.as_ref()], program_id).0
}

/// Escrow token account holding the listed NFT.
#[must_use]
pub fn vault_address(program_id: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[VAULT_SEED, mint.as_ref()], program_id).0
}

#[must_use]
pub fn metadata_address(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[METADATA_SEED, METADATA_PROGRAM_ID.as_ref(), mint.as_ref()],
        &METADATA_PROGRAM_ID,
    )
    .0
}

#[must_use]
pub fn master_edition_address(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[METADATA_SEED, METADATA_PROGRAM_ID.as_ref(), mint.as_ref(), EDITION_SEED],
        &METADATA_PROGRAM_ID,
    )
    .0
}

/// Associated token account of `owner` for `mint` under the classic token program.
#[must_use]
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

/// Every program-derived address that participates in a listing of `mint`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListingAddresses {
    pub marketplace: Pubkey,
    pub treasury: Pubkey,
    pub listing: Pubkey,
    pub vault: Pubkey,
    pub metadata: Pubkey,
    pub master_edition: Pubkey,
}

impl ListingAddresses {
    #[must_use]
    pub fn derive(program_id: &Pubkey, mint: &Pubkey) -> Self {
        Self {
            marketplace: marketplace_address(program_id),
            treasury: treasury_address(program_id),
            listing: listing_address(program_id, mint),
            vault: vault_address(program_id, mint),
            metadata: metadata_address(mint),
            master_edition: master_edition_address(mint),
        }
    }
}
