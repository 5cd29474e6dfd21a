use super::*;
use solana_program::instruction::AccountMeta;

fn sample(payer: Pubkey, second: Option<Pubkey>) -> Transaction {
    let program = Pubkey::new_from_array([9; 32]);
    let mut accounts = vec![AccountMeta::new(payer, true)];
    if let Some(other) = second {
        accounts.push(AccountMeta::new_readonly(other, true));
    }
    let ix = Instruction::new_with_bytes(program, &[1, 2, 3], accounts);
    new_unsigned(&[ix], &payer, &Hash::new_from_array([3; 32]))
}

#[test]
fn new_unsigned_reserves_one_slot_per_signer() {
    let payer = Pubkey::new_from_array([1; 32]);
    let tx = sample(payer, Some(Pubkey::new_from_array([2; 32])));
    assert_eq!(tx.signatures.len(), 2);
    assert!(!tx.is_signed());
    assert_eq!(signature_id(&tx), None);
    assert_eq!(tx.message.recent_blockhash, Hash::new_from_array([3; 32]));
}

#[test]
fn signer_keys_start_with_fee_payer() {
    let payer = Pubkey::new_from_array([1; 32]);
    let other = Pubkey::new_from_array([2; 32]);
    let tx = sample(payer, Some(other));
    let keys = signer_keys(&tx);
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0], payer);
    assert!(keys.contains(&other));
}

#[test]
fn set_signature_fills_matching_slot() {
    let payer = Pubkey::new_from_array([1; 32]);
    let mut tx = sample(payer, None);
    set_signature(&mut tx, &payer, Signature::from([7; 64])).unwrap();
    assert!(tx.is_signed());
    assert_eq!(signature_id(&tx), Some(bs58::encode([7u8; 64]).into_string()));
}

#[test]
fn set_signature_rejects_stranger() {
    let payer = Pubkey::new_from_array([1; 32]);
    let stranger = Pubkey::new_from_array([5; 32]);
    let mut tx = sample(payer, None);
    assert_eq!(
        set_signature(&mut tx, &stranger, Signature::from([7; 64])),
        Err(TransactionError::NotSigner(stranger))
    );
    assert!(!tx.is_signed());
}

#[test]
fn wire_bytes_are_count_then_signatures_then_message() {
    let payer = Pubkey::new_from_array([1; 32]);
    let mut tx = sample(payer, None);
    set_signature(&mut tx, &payer, Signature::from([4; 64])).unwrap();
    let bytes = to_bytes(&tx).unwrap();
    assert_eq!(bytes[0], 1);
    assert_eq!(&bytes[1..65], &[4; 64]);
    assert_eq!(&bytes[65..], tx.message_data().as_slice());
    assert_eq!(from_base64(&to_base64(&tx).unwrap()).unwrap(), tx);
}

#[test]
fn from_bytes_rejects_count_mismatch() {
    let payer = Pubkey::new_from_array([1; 32]);
    let tx = sample(payer, None);
    let mut bytes = vec![0u8];
    bytes.extend_from_slice(&tx.message_data());
    assert_eq!(from_bytes(&bytes), Err(TransactionError::SignatureCount { found: 0, required: 1 }));
}

#[test]
fn from_bytes_rejects_truncated_input() {
    assert!(matches!(from_bytes(&[2, 0, 0]), Err(TransactionError::Wire(_))));
}

#[test]
fn from_base64_rejects_bad_text() {
    assert!(matches!(from_base64("not base64!"), Err(TransactionError::Base64(_))));
}

#[test]
fn wallet_signature_text_fills_the_payer_slot() {
    let payer = Pubkey::new_from_array([1; 32]);
    let mut tx = sample(payer, None);
    assert_eq!(bs58::decode(message_base58(&tx)).into_vec().unwrap(), tx.message_data());

    let text = bs58::encode([6u8; 64]).into_string();
    set_signature(&mut tx, &payer, parse_signature(&text).unwrap()).unwrap();
    assert_eq!(signature_id(&tx), Some(text));
    assert!(matches!(parse_signature("abc"), Err(TransactionError::Signature(_))));
}
