use base64::Engine as _;
use serde_json::{Value, json};

use super::*;
use crate::Hash;
use crate::accounts::account_discriminator;
use crate::error::user_message;
use crate::gateway::NftMetadata;
use crate::rpc::RpcError;
use crate::test_support::{FakeMetadata, FakeRpc, FakeSigner};
use crate::validation::ValidationError;

const GATEWAY: &str = "https://gw.test";
const SIGNATURE: &str = "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";

fn program() -> Pubkey {
    Pubkey::new_from_array([42; 32])
}

fn b64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

fn listing_bytes(maker: u8, mint: u8, price: u64, metadata: &str) -> Vec<u8> {
    let mut data = account_discriminator("Listing").to_vec();
    data.extend_from_slice(&[maker; 32]);
    data.extend_from_slice(&[mint; 32]);
    data.extend_from_slice(&price.to_le_bytes());
    data.extend_from_slice(&u32::try_from(metadata.len()).unwrap().to_le_bytes());
    data.extend_from_slice(metadata.as_bytes());
    data.push(255);
    data
}

fn keyed(address: u8, data: &[u8]) -> Value {
    json!({
        "pubkey": Pubkey::new_from_array([address; 32]).to_string(),
        "account": { "data": [b64(data), "base64"], "lamports": 1 }
    })
}

fn blockhash_answer() -> Value {
    json!({ "context": { "slot": 1 }, "value": { "blockhash": Hash::new_from_array([7; 32]).to_string(), "lastValidBlockHeight": 100 } })
}

fn writable_rpc() -> FakeRpc {
    FakeRpc::new()
        .with("getLatestBlockhash", blockhash_answer())
        .with("sendTransaction", json!(SIGNATURE))
}


#[tokio::test]
async fn fetch_listings_survives_one_failed_metadata_fetch() {
    let rpc = FakeRpc::new().with(
        "getProgramAccounts",
        json!([
            keyed(1, &listing_bytes(11, 21, 500, "QmGood")),
            keyed(2, &listing_bytes(12, 22, 700, "QmMissing")),
            keyed(3, b"garbage-account-data"),
        ]),
    );
    let gateway = FakeMetadata::default().with(
        "https://gw.test/ipfs/QmGood",
        NftMetadata { name: Some("Good".to_owned()), symbol: Some("GD".to_owned()), ..NftMetadata::default() },
    );

    let views = fetch_listings(&rpc, &gateway, &program(), GATEWAY, None, 1_000).await.unwrap();

    assert_eq!(views.len(), 2);
    assert_eq!(views[0].name, "Good");
    assert_eq!(views[0].symbol, "GD");
    assert_eq!(views[0].price, 500);
    assert_eq!(views[0].listing_account, Pubkey::new_from_array([1; 32]));
    assert_eq!(views[1].name, "Unknown NFT");
    assert_eq!(views[1].symbol, "");
    assert_eq!(views[1].seller, Pubkey::new_from_array([12; 32]));
    assert_eq!(views[1].timestamp, 1_000);
    assert_eq!(gateway.requested().len(), 2);
}

#[tokio::test]
async fn fetch_listings_by_seller_adds_maker_filter() {
    let rpc = FakeRpc::new().with("getProgramAccounts", json!([]));
    let seller = Pubkey::new_from_array([9; 32]);
    let views = fetch_listings(&rpc, &FakeMetadata::default(), &program(), GATEWAY, Some(&seller), 0)
        .await
        .unwrap();
    assert!(views.is_empty());

    let (_, params) = rpc.calls().remove(0);
    let filters = params[1]["filters"].as_array().unwrap();
    assert_eq!(filters.len(), 2);
    assert_eq!(filters[1]["memcmp"]["offset"], 8);
    assert_eq!(filters[1]["memcmp"]["bytes"], seller.to_string());
}

#[tokio::test]
async fn fetch_listings_propagates_scan_failure() {
    let rpc = FakeRpc::new().failing("getProgramAccounts", RpcError::Transport("down".to_owned()));
    let err = fetch_listings(&rpc, &FakeMetadata::default(), &program(), GATEWAY, None, 0).await.unwrap_err();
    assert_eq!(err.error_code(), "E_RPC");
}

#[tokio::test]
async fn fetch_marketplace_absent_and_present() {
    let rpc = FakeRpc::new().with("getMultipleAccounts", json!({ "context": { "slot": 1 }, "value": [null] }));
    assert!(fetch_marketplace(&rpc, &program()).await.unwrap().is_none());

    let mut data = account_discriminator("Marketplace").to_vec();
    data.extend_from_slice(&[1; 32]);
    data.extend_from_slice(&150u16.to_le_bytes());
    data.push(254);
    data.extend_from_slice(&[2; 32]);
    data.push(253);
    data.extend_from_slice(&3u32.to_le_bytes());
    data.extend_from_slice(b"Hub");
    let rpc = FakeRpc::new().with(
        "getMultipleAccounts",
        json!({ "context": { "slot": 1 }, "value": [{ "data": [b64(&data), "base64"], "lamports": 1 }] }),
    );
    let market = fetch_marketplace(&rpc, &program()).await.unwrap().unwrap();
    assert_eq!(market.name, "Hub");
    assert_eq!(market.fee_bps, 150);
    let (_, params) = rpc.calls().remove(0);
    assert_eq!(params[0][0], marketplace_address(&program()).to_string());
}

#[tokio::test]
async fn fetch_listing_reads_the_mint_listing_account() {
    let mint = Pubkey::new_from_array([21; 32]);
    let rpc = FakeRpc::new().with(
        "getMultipleAccounts",
        json!({ "context": { "slot": 1 }, "value": [{ "data": [b64(&listing_bytes(11, 21, 900, "QmA")), "base64"], "lamports": 1 }] }),
    );
    let listing = fetch_listing(&rpc, &program(), &mint).await.unwrap().unwrap();
    assert_eq!(listing.maker, Pubkey::new_from_array([11; 32]));
    assert_eq!(listing.price, 900);
    let (_, params) = rpc.calls().remove(0);
    assert_eq!(params[0][0], listing_address(&program(), &mint).to_string());

    let empty = FakeRpc::new().with("getMultipleAccounts", json!({ "context": { "slot": 1 }, "value": [null] }));
    assert!(fetch_listing(&empty, &program(), &mint).await.unwrap().is_none());
}

fn metadata_account(mint: &Pubkey, name: &str, uri: &str) -> Vec<u8> {
    let mut data = vec![crate::token_metadata::METADATA_V1_KEY];
    data.extend_from_slice(&[1; 32]);
    data.extend_from_slice(&mint.to_bytes());
    for (s, width) in [(name, 32usize), ("SYM", 10), (uri, 200)] {
        let mut bytes = s.as_bytes().to_vec();
        bytes.resize(width, 0);
        data.extend_from_slice(&u32::try_from(width).unwrap().to_le_bytes());
        data.extend(bytes);
    }
    data
}

fn token_account(account: u8, mint: &Pubkey, amount: &str, decimals: u8) -> Value {
    json!({
        "pubkey": Pubkey::new_from_array([account; 32]).to_string(),
        "account": { "data": { "parsed": { "info": {
            "mint": mint.to_string(),
            "tokenAmount": { "amount": amount, "decimals": decimals }
        } } } }
    })
}

#[tokio::test]
async fn fetch_owned_nfts_keeps_single_unit_tokens_only() {
    let nft_mint = Pubkey::new_from_array([50; 32]);
    let coin_mint = Pubkey::new_from_array([51; 32]);
    let rpc = FakeRpc::new()
        .with(
            "getTokenAccountsByOwner",
            json!({ "context": { "slot": 1 }, "value": [
                token_account(60, &nft_mint, "1", 0),
                token_account(61, &coin_mint, "1000000", 6),
            ] }),
        )
        .with(
            "getMultipleAccounts",
            json!({ "context": { "slot": 1 }, "value": [{
                "data": [b64(&metadata_account(&nft_mint, "On Chain", "https://meta.test/1.json")), "base64"],
                "lamports": 1
            }] }),
        );
    let gateway = FakeMetadata::default().with(
        "https://meta.test/1.json",
        NftMetadata { image: Some("https://img.test/1.png".to_owned()), ..NftMetadata::default() },
    );

    let owned = fetch_owned_nfts(&rpc, &gateway, &Pubkey::new_from_array([1; 32]), GATEWAY).await.unwrap();

    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].mint, nft_mint);
    assert_eq!(owned[0].token_account, Pubkey::new_from_array([60; 32]));
    assert_eq!(owned[0].name, "On Chain");
    assert_eq!(owned[0].symbol, "SYM");
    assert_eq!(owned[0].image.as_deref(), Some("https://img.test/1.png"));

    let (_, params) = rpc.calls().remove(1);
    assert_eq!(params[0][0], metadata_address(&nft_mint).to_string());
}

#[tokio::test]
async fn listing_form_with_zero_price_never_touches_network() {
    let rpc = writable_rpc();
    let signer = FakeSigner::new(1);
    let session = MarketSession::new(&rpc, program()).with_signer(Some(&signer));
    let mint = Pubkey::new_from_array([5; 32]).to_string();

    let err = session.submit_listing_form(&mint, "0").await.unwrap_err();

    assert!(matches!(err, MarketError::Validation(ValidationError::PriceNotPositive)));
    assert_eq!(user_message(&err, "Failed to list NFT"), "Price must be greater than zero.");
    assert_eq!(rpc.call_count(), 0);
}

#[tokio::test]
async fn listing_form_rejects_bad_mint_before_network() {
    let rpc = writable_rpc();
    let signer = FakeSigner::new(1);
    let session = MarketSession::new(&rpc, program()).with_signer(Some(&signer));
    let err = session.submit_listing_form("xyz", "1").await.unwrap_err();
    assert!(matches!(err, MarketError::Validation(ValidationError::InvalidMint)));
    assert_eq!(rpc.call_count(), 0);
}

#[tokio::test]
async fn writes_without_wallet_fail_before_network() {
    let rpc = writable_rpc();
    let session: MarketSession<'_, FakeRpc, FakeSigner> = MarketSession::new(&rpc, program());
    let mint = Pubkey::new_from_array([5; 32]);

    assert!(matches!(session.list_nft(&mint, 1).await, Err(MarketError::WalletNotConnected)));
    assert!(matches!(session.delist_nft(&mint).await, Err(MarketError::WalletNotConnected)));
    assert!(matches!(session.purchase_nft(&mint, &mint).await, Err(MarketError::WalletNotConnected)));
    assert!(matches!(session.update_fee(100).await, Err(MarketError::WalletNotConnected)));
    assert_eq!(session.wallet(), None);
    assert_eq!(rpc.call_count(), 0);
}

#[tokio::test]
async fn admin_validation_runs_before_network() {
    let rpc = writable_rpc();
    let signer = FakeSigner::new(1);
    let session = MarketSession::new(&rpc, program()).with_signer(Some(&signer));

    let long = "n".repeat(33);
    assert!(matches!(
        session.initialize_marketplace(&long, 100).await,
        Err(MarketError::Validation(ValidationError::NameTooLong))
    ));
    assert!(matches!(
        session.initialize_marketplace("Shop", 10_001).await,
        Err(MarketError::Validation(ValidationError::FeeOutOfRange))
    ));
    assert!(matches!(session.update_fee(10_001).await, Err(MarketError::Validation(ValidationError::FeeOutOfRange))));
    assert_eq!(rpc.call_count(), 0);
}

#[tokio::test]
async fn list_nft_signs_and_sends_one_transaction() {
    let rpc = writable_rpc();
    let signer = FakeSigner::new(1);
    let session = MarketSession::new(&rpc, program()).with_signer(Some(&signer));
    let mint = Pubkey::new_from_array([5; 32]);

    let signature = session.list_nft(&mint, 1).await.unwrap();

    assert_eq!(signature, SIGNATURE);
    assert_eq!(rpc.methods(), ["getLatestBlockhash", "sendTransaction"]);
    let (_, params) = rpc.calls().remove(1);
    assert_eq!(params[1]["encoding"], "base64");
    let sent = transaction::from_base64(params[0].as_str().unwrap()).unwrap();
    assert!(sent.is_signed());
    assert_eq!(transaction::signer_keys(&sent), [signer.key]);
}

#[tokio::test]
async fn boundary_values_are_submitted() {
    let rpc = writable_rpc();
    let signer = FakeSigner::new(1);
    let session = MarketSession::new(&rpc, program()).with_signer(Some(&signer));
    let name = "n".repeat(32);

    assert!(session.initialize_marketplace(&name, 10_000).await.is_ok());
    assert!(session.update_fee(0).await.is_ok());
    assert_eq!(rpc.methods().len(), 4);
}

#[tokio::test]
async fn refused_signature_stops_before_send() {
    let rpc = writable_rpc();
    let signer = FakeSigner { refuse: true, ..FakeSigner::new(1) };
    let session = MarketSession::new(&rpc, program()).with_signer(Some(&signer));
    let mint = Pubkey::new_from_array([5; 32]);

    let err = session.purchase_nft(&Pubkey::new_from_array([2; 32]), &mint).await.unwrap_err();

    assert_eq!(err.error_code(), "E_SIGNER");
    assert_eq!(rpc.methods(), ["getLatestBlockhash"]);
}

#[tokio::test]
async fn program_rejection_maps_to_table_message() {
    let rpc = FakeRpc::new().with("getLatestBlockhash", blockhash_answer()).failing(
        "sendTransaction",
        RpcError::Remote {
            code: -32002,
            message: "Transaction simulation failed: Error processing Instruction 0: custom program error: 0x1773"
                .to_owned(),
            logs: Vec::new(),
        },
    );
    let signer = FakeSigner::new(1);
    let session = MarketSession::new(&rpc, program()).with_signer(Some(&signer));

    let err = session.delist_nft(&Pubkey::new_from_array([5; 32])).await.unwrap_err();

    assert_eq!(user_message(&err, "Failed to delist NFT"), "The listing owner does not match the signer.");
}

#[tokio::test]
async fn confirm_reports_status() {
    let rpc = FakeRpc::new().with(
        "getSignatureStatuses",
        json!({ "context": { "slot": 1 }, "value": [{ "err": null, "confirmationStatus": "confirmed" }] }),
    );
    let session: MarketSession<'_, FakeRpc, FakeSigner> = MarketSession::new(&rpc, program());
    assert_eq!(session.confirm(SIGNATURE).await.unwrap(), SignatureStatus::Confirmed);
}

#[tokio::test]
async fn await_confirmation_stops_at_first_settled_status() {
    let rpc = FakeRpc::new().with(
        "getSignatureStatuses",
        json!({ "context": { "slot": 1 }, "value": [{ "err": { "InstructionError": [0, { "Custom": 6003 }] }, "confirmationStatus": "confirmed" }] }),
    );
    let session: MarketSession<'_, FakeRpc, FakeSigner> = MarketSession::new(&rpc, program());
    let pauses = std::cell::Cell::new(0);

    let status = session
        .await_confirmation(SIGNATURE, 5, || {
            pauses.set(pauses.get() + 1);
            async {}
        })
        .await
        .unwrap();

    assert!(matches!(status, SignatureStatus::Failed(_)));
    assert_eq!(rpc.call_count(), 1);
    assert_eq!(pauses.get(), 0);
}

#[tokio::test]
async fn await_confirmation_gives_up_after_attempts() {
    let rpc = FakeRpc::new().with("getSignatureStatuses", json!({ "context": { "slot": 1 }, "value": [null] }));
    let session: MarketSession<'_, FakeRpc, FakeSigner> = MarketSession::new(&rpc, program());
    let pauses = std::cell::Cell::new(0);

    let status = session
        .await_confirmation(SIGNATURE, 3, || {
            pauses.set(pauses.get() + 1);
            async {}
        })
        .await
        .unwrap();

    assert_eq!(status, SignatureStatus::Pending);
    assert_eq!(rpc.call_count(), 3);
    assert_eq!(pauses.get(), 2);
}
