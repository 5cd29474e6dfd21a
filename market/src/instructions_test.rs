use super::*;
use crate::pda::{listing_address, metadata_address, vault_address};

fn program() -> Pubkey {
    Pubkey::new_from_array([3; 32])
}

fn user() -> Pubkey {
    Pubkey::new_from_array([11; 32])
}

fn mint() -> Pubkey {
    Pubkey::new_from_array([21; 32])
}

#[test]
fn discriminator_matches_well_known_anchor_initialize() {
    assert_eq!(instruction_discriminator("initialize"), [175, 175, 109, 31, 13, 152, 155, 237]);
}

#[test]
fn discriminators_differ_per_instruction() {
    let all = [INITIALIZE_MARKETPLACE, LIST_NFT, PURCHASE_NFT, DELIST_NFT, UPDATE_FEE].map(instruction_discriminator);
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn list_nft_encodes_price_little_endian_after_discriminator() {
    let ix = list_nft(&program(), &user(), &mint(), 1_500_000_000).unwrap();
    assert_eq!(&ix.data[..8], &instruction_discriminator(LIST_NFT));
    assert_eq!(&ix.data[8..], &1_500_000_000u64.to_le_bytes());
}

#[test]
fn list_nft_account_order_matches_program_interface() {
    let ix = list_nft(&program(), &user(), &mint(), 1).unwrap();
    assert_eq!(ix.program_id, program());
    assert_eq!(ix.accounts.len(), 12);
    assert_eq!(ix.accounts[0].pubkey, user());
    assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
    assert_eq!(ix.accounts[2].pubkey, mint());
    assert_eq!(ix.accounts[4].pubkey, vault_address(&program(), &mint()));
    assert_eq!(ix.accounts[5].pubkey, listing_address(&program(), &mint()));
    assert_eq!(ix.accounts[6].pubkey, metadata_address(&mint()));
    assert_eq!(ix.accounts[8].pubkey, METADATA_PROGRAM_ID);
    assert_eq!(ix.accounts[11].pubkey, TOKEN_PROGRAM_ID);
    assert_eq!(ix.accounts.iter().filter(|a| a.is_signer).count(), 1);
}

#[test]
fn initialize_marketplace_encodes_borsh_string_then_fee() {
    let ix = initialize_marketplace(&program(), &user(), "Shop", 250).unwrap();
    let mut expected = instruction_discriminator(INITIALIZE_MARKETPLACE).to_vec();
    expected.extend_from_slice(&4u32.to_le_bytes());
    expected.extend_from_slice(b"Shop");
    expected.extend_from_slice(&250u16.to_le_bytes());
    assert_eq!(ix.data, expected);
    assert_eq!(ix.accounts.len(), 5);
    assert!(ix.accounts[1].is_writable);
    assert!(!ix.accounts[2].is_writable);
}

#[test]
fn purchase_nft_has_no_args_and_taker_signs() {
    let maker = Pubkey::new_from_array([12; 32]);
    let ix = purchase_nft(&program(), &user(), &maker, &mint()).unwrap();
    assert_eq!(ix.data, instruction_discriminator(PURCHASE_NFT).to_vec());
    assert_eq!(ix.accounts.len(), 11);
    assert_eq!(ix.accounts[0].pubkey, user());
    assert!(ix.accounts[0].is_signer);
    assert_eq!(ix.accounts[1].pubkey, maker);
    assert!(!ix.accounts[1].is_signer);
    assert_eq!(ix.accounts[4].pubkey, associated_token_address(&user(), &mint()));
}

#[test]
fn delist_nft_targets_makers_token_account() {
    let ix = delist_nft(&program(), &user(), &mint()).unwrap();
    assert_eq!(ix.accounts.len(), 12);
    assert_eq!(ix.accounts[3].pubkey, associated_token_address(&user(), &mint()));
    assert!(!ix.accounts[1].is_writable);
}

#[test]
fn update_fee_encodes_u16() {
    let ix = update_fee(&program(), &user(), 10_000).unwrap();
    assert_eq!(&ix.data[8..], &10_000u16.to_le_bytes());
    assert_eq!(ix.accounts.len(), 4);
}

struct Unencodable;

impl BorshSerialize for Unencodable {
    fn serialize<W: std::io::Write>(&self, _writer: &mut W) -> std::io::Result<()> {
        Err(std::io::Error::other("cannot encode"))
    }
}

#[test]
fn argument_encoding_failure_is_reported() {
    let err = instruction_data(LIST_NFT, &Unencodable).unwrap_err();
    assert!(matches!(&err, MarketError::Encode(text) if text.contains("list_nft")));
    assert_eq!(err.error_code(), "E_ENCODE");
}
