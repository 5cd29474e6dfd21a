use super::*;

#[test]
fn parse_wallet_key_accepts_base58() {
    let key = Pubkey::new_from_array([9; 32]);
    assert_eq!(parse_wallet_key(&format!(" {key} ")), Ok(key));
}

#[test]
fn parse_wallet_key_rejects_garbage() {
    let err = parse_wallet_key("not-a-key").unwrap_err();
    assert!(err.starts_with("wallet returned invalid key"));
}

#[test]
fn browser_wallet_reports_its_key() {
    let key = Pubkey::new_from_array([4; 32]);
    assert_eq!(BrowserWallet::new(key).pubkey(), key);
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn server_render_has_no_wallet() {
    assert!(!is_available());
    let result = futures::executor::block_on(connect(false));
    assert!(result.is_err());
}

#[test]
fn wallet_signature_lands_in_the_payer_slot() {
    let key = Pubkey::new_from_array([4; 32]);
    let ix = market::instructions::delist_nft(&Pubkey::new_from_array([3; 32]), &key, &Pubkey::new_from_array([5; 32]))
        .unwrap();
    let tx = transaction::new_unsigned(&[ix], &key, &market::Hash::new_from_array([1; 32]));
    let text = transaction::Signature::from([9; 64]).to_string();

    assert!(apply_wallet_signature(tx.clone(), &Pubkey::new_from_array([8; 32]), &text).is_err());
    assert!(apply_wallet_signature(tx.clone(), &key, "not a signature").is_err());

    let signed = apply_wallet_signature(tx, &key, &text).unwrap();
    assert!(signed.is_signed());
    assert_eq!(transaction::signature_id(&signed), Some(text));
}
