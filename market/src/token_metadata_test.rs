use super::*;

fn padded(s: &str, width: usize) -> Vec<u8> {
    let mut bytes = s.as_bytes().to_vec();
    bytes.resize(width, 0);
    let mut out = u32::try_from(width).unwrap().to_le_bytes().to_vec();
    out.extend(bytes);
    out
}

fn encode(key: u8) -> Vec<u8> {
    let mut data = vec![key];
    data.extend_from_slice(&[1; 32]);
    data.extend_from_slice(&[2; 32]);
    data.extend(padded("Cool Cat", 32));
    data.extend(padded("CAT", 10));
    data.extend(padded("https://example.com/cat.json", 200));
    data.extend_from_slice(&500u16.to_le_bytes());
    data
}

#[test]
fn decode_trims_nul_padding() {
    let meta = TokenMetadata::decode(&encode(METADATA_V1_KEY)).unwrap();
    assert_eq!(meta.update_authority, Pubkey::new_from_array([1; 32]));
    assert_eq!(meta.mint, Pubkey::new_from_array([2; 32]));
    assert_eq!(meta.name, "Cool Cat");
    assert_eq!(meta.symbol, "CAT");
    assert_eq!(meta.uri, "https://example.com/cat.json");
}

#[test]
fn decode_rejects_other_account_kinds() {
    assert_eq!(TokenMetadata::decode(&encode(6)), Err(DecodeError::Discriminator("TokenMetadata")));
}

#[test]
fn decode_rejects_truncated_data() {
    let data = encode(METADATA_V1_KEY);
    assert!(matches!(TokenMetadata::decode(&data[..70]), Err(DecodeError::Fields { .. })));
}
