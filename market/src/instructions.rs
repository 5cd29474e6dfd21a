//! Instruction builders for the marketplace program.
//!
//! The program is an Anchor program: instruction data is the 8-byte
//! `sha256("global:<name>")` prefix followed by borsh-encoded arguments, and
//! each instruction takes a fixed, ordered account list. The order and the
//! writable/signer flags below mirror the program interface exactly.

#[cfg(test)]
#[path = "instructions_test.rs"]
mod instructions_test;

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;

use crate::error::MarketError;
use crate::pda::{
    ASSOCIATED_TOKEN_PROGRAM_ID, ListingAddresses, METADATA_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID,
    associated_token_address, marketplace_address, treasury_address,
};

pub const INITIALIZE_MARKETPLACE: &str = "initialize_marketplace";
pub const LIST_NFT: &str = "list_nft";
pub const PURCHASE_NFT: &str = "purchase_nft";
pub const DELIST_NFT: &str = "delist_nft";
pub const UPDATE_FEE: &str = "update_fee";

/// Anchor instruction discriminator for a snake_case instruction name.
#[must_use]
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("global:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

fn instruction_data<A: BorshSerialize>(name: &str, args: &A) -> Result<Vec<u8>, MarketError> {
    let mut data = instruction_discriminator(name).to_vec();
    args.serialize(&mut data).map_err(|e| MarketError::Encode(format!("{name} arguments: {e}")))?;
    Ok(data)
}

#[derive(BorshSerialize)]
struct InitializeMarketplaceArgs<'a> {
    name: &'a str,
    fee: u16,
}

#[derive(BorshSerialize)]
struct ListNftArgs {
    price: u64,
}

#[derive(BorshSerialize)]
struct UpdateFeeArgs {
    updated_fee: u16,
}

#[derive(BorshSerialize)]
struct NoArgs {}

/// `initializeMarketplace(name, fee)`, signed by the admin.
///
/// # Errors
///
/// Returns [`MarketError::Encode`] if the arguments cannot be serialized.
pub fn initialize_marketplace(program_id: &Pubkey, admin: &Pubkey, name: &str, fee: u16) -> Result<Instruction, MarketError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(marketplace_address(program_id), false),
            AccountMeta::new_readonly(treasury_address(program_id), false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: instruction_data(INITIALIZE_MARKETPLACE, &InitializeMarketplaceArgs { name, fee })?,
    })
}

/// `listNft(price)`: moves the maker's token into the vault and opens a listing.
///
/// # Errors
///
/// See [`initialize_marketplace`].
pub fn list_nft(program_id: &Pubkey, maker: &Pubkey, mint: &Pubkey, price: u64) -> Result<Instruction, MarketError> {
    let addrs = ListingAddresses::derive(program_id, mint);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*maker, true),
            AccountMeta::new(addrs.marketplace, false),
            AccountMeta::new(*mint, false),
            AccountMeta::new(associated_token_address(maker, mint), false),
            AccountMeta::new(addrs.vault, false),
            AccountMeta::new(addrs.listing, false),
            AccountMeta::new(addrs.metadata, false),
            AccountMeta::new(addrs.master_edition, false),
            AccountMeta::new_readonly(METADATA_PROGRAM_ID, false),
            AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: instruction_data(LIST_NFT, &ListNftArgs { price })?,
    })
}

/// `purchaseNft()`: pays the maker (minus fee to treasury) and moves the token to the taker.
///
/// # Errors
///
/// See [`initialize_marketplace`].
pub fn purchase_nft(
    program_id: &Pubkey,
    taker: &Pubkey,
    maker: &Pubkey,
    mint: &Pubkey,
) -> Result<Instruction, MarketError> {
    let addrs = ListingAddresses::derive(program_id, mint);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*taker, true),
            AccountMeta::new(*maker, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(addrs.marketplace, false),
            AccountMeta::new(associated_token_address(taker, mint), false),
            AccountMeta::new(addrs.vault, false),
            AccountMeta::new(addrs.listing, false),
            AccountMeta::new(addrs.treasury, false),
            AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: instruction_data(PURCHASE_NFT, &NoArgs {})?,
    })
}

/// `delistNft()`: closes the listing and returns the token to the maker.
///
/// # Errors
///
/// See [`initialize_marketplace`].
pub fn delist_nft(program_id: &Pubkey, maker: &Pubkey, mint: &Pubkey) -> Result<Instruction, MarketError> {
    let addrs = ListingAddresses::derive(program_id, mint);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*maker, true),
            AccountMeta::new_readonly(addrs.marketplace, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(associated_token_address(maker, mint), false),
            AccountMeta::new(addrs.vault, false),
            AccountMeta::new(addrs.listing, false),
            AccountMeta::new(addrs.metadata, false),
            AccountMeta::new_readonly(addrs.master_edition, false),
            AccountMeta::new_readonly(METADATA_PROGRAM_ID, false),
            AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: instruction_data(DELIST_NFT, &NoArgs {})?,
    })
}

/// `updateFee(updatedFee)`, signed by the admin.
///
/// # Errors
///
/// See [`initialize_marketplace`].
pub fn update_fee(program_id: &Pubkey, admin: &Pubkey, updated_fee: u16) -> Result<Instruction, MarketError> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new_readonly(marketplace_address(program_id), false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: instruction_data(UPDATE_FEE, &UpdateFeeArgs { updated_fee })?,
    })
}
