use super::*;

fn encode_listing(maker: [u8; 32], mint: [u8; 32], price: u64, metadata: &str, bump: u8) -> Vec<u8> {
    let mut data = account_discriminator("Listing").to_vec();
    data.extend_from_slice(&maker);
    data.extend_from_slice(&mint);
    data.extend_from_slice(&price.to_le_bytes());
    data.extend_from_slice(&u32::try_from(metadata.len()).unwrap().to_le_bytes());
    data.extend_from_slice(metadata.as_bytes());
    data.push(bump);
    data
}

#[test]
fn decode_listing_reads_all_fields() {
    let data = encode_listing([1; 32], [2; 32], 42, "QmHash", 254);
    let listing = ListingAccount::decode(&data).unwrap();
    assert_eq!(listing.maker, Pubkey::new_from_array([1; 32]));
    assert_eq!(listing.nft_mint, Pubkey::new_from_array([2; 32]));
    assert_eq!(listing.price, 42);
    assert_eq!(listing.metadata, "QmHash");
    assert_eq!(listing.bump, 254);
}

#[test]
fn decode_listing_tolerates_trailing_padding() {
    let mut data = encode_listing([1; 32], [2; 32], 42, "x", 1);
    data.extend_from_slice(&[0; 64]);
    assert!(ListingAccount::decode(&data).is_ok());
}

#[test]
fn decode_listing_rejects_foreign_discriminator() {
    let mut data = encode_listing([1; 32], [2; 32], 42, "x", 1);
    data[..8].copy_from_slice(&account_discriminator("Marketplace"));
    assert_eq!(ListingAccount::decode(&data), Err(DecodeError::Discriminator("Listing")));
}

#[test]
fn decode_listing_rejects_short_data() {
    assert_eq!(ListingAccount::decode(&[0; 4]), Err(DecodeError::TooShort(4)));
    let data = encode_listing([1; 32], [2; 32], 42, "x", 1);
    assert!(matches!(ListingAccount::decode(&data[..40]), Err(DecodeError::Fields { .. })));
}

#[test]
fn decode_marketplace_reads_all_fields() {
    let mut data = account_discriminator("Marketplace").to_vec();
    data.extend_from_slice(&[9; 32]);
    data.extend_from_slice(&250u16.to_le_bytes());
    data.push(255);
    data.extend_from_slice(&[8; 32]);
    data.push(253);
    data.extend_from_slice(&4u32.to_le_bytes());
    data.extend_from_slice(b"Shop");

    let market = MarketplaceAccount::decode(&data).unwrap();
    assert_eq!(market.authority, Pubkey::new_from_array([9; 32]));
    assert_eq!(market.fee_bps, 250);
    assert_eq!(market.marketplace_bump, 255);
    assert_eq!(market.treasury, Pubkey::new_from_array([8; 32]));
    assert_eq!(market.treasury_bump, 253);
    assert_eq!(market.name, "Shop");
    assert!((market.fee_percent() - 2.5).abs() < f64::EPSILON);
}

#[test]
fn listing_filters_add_seller_memcmp_at_maker_offset() {
    let seller = Pubkey::new_from_array([4; 32]);
    let all = listing_filters(None);
    assert_eq!(all.len(), 1);

    let mine = listing_filters(Some(&seller));
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[1], RpcFilter::Memcmp { offset: 8, bytes: vec![4; 32] });
}

#[test]
fn maker_offset_points_at_maker_bytes() {
    let data = encode_listing([7; 32], [2; 32], 1, "", 0);
    assert_eq!(&data[LISTING_MAKER_OFFSET..LISTING_MAKER_OFFSET + 32], &[7; 32]);
}
