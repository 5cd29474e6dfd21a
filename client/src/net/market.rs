//! Marketplace actions as the pages call them.
//!
//! Each action builds a fresh [`MarketSession`] from the configuration and
//! the connected key, so nothing long-lived holds the transport or wallet.
//! Listing reads are de-duplicated per seller filter: a poll that fires while
//! a refetch is still running awaits the same request. After a write, pages
//! call [`settle`] and then [`reload_listings`], which drops any request
//! started before the write confirmed.

#[cfg(test)]
#[path = "market_test.rs"]
mod market_test;

use market::accounts::MarketplaceAccount;
use market::config::MarketConfig;
use market::listings::{ListingView, OwnedNft};
use market::query::InFlight;
use market::rpc::SignatureStatus;
use market::service::{self, MarketSession};
use market::{MarketError, Pubkey};

use super::gateway::BrowserGateway;
use super::rpc::BrowserRpc;
use super::wallet::BrowserWallet;
use crate::config::{CONFIRM_ATTEMPTS, CONFIRM_POLL_MS};
use crate::state::now_ms;

type ListingsResult = Result<Vec<ListingView>, MarketError>;

thread_local! {
    static LISTINGS_IN_FLIGHT: InFlight<ListingsResult> = InFlight::new();
}

fn listings_key(seller: Option<&Pubkey>) -> String {
    seller.map_or_else(|| "listings".to_owned(), |key| format!("listings:{key}"))
}

/// Active listings, optionally only those made by `seller`.
///
/// # Errors
///
/// Fails only if the account scan fails; metadata failures degrade per card.
pub async fn load_listings(config: &MarketConfig, seller: Option<Pubkey>) -> ListingsResult {
    let key = listings_key(seller.as_ref());
    let in_flight = LISTINGS_IN_FLIGHT.with(Clone::clone);
    let config = config.clone();
    in_flight
        .run(&key, move || async move {
            let rpc = BrowserRpc::new(&config.rpc_url);
            service::fetch_listings(
                &rpc,
                &BrowserGateway,
                &config.program_id,
                &config.gateway_url,
                seller.as_ref(),
                now_ms(),
            )
            .await
        })
        .await
}

/// Like [`load_listings`], but never joins a request that was already
/// running; used once a write has confirmed.
///
/// # Errors
///
/// See [`load_listings`].
pub async fn reload_listings(config: &MarketConfig, seller: Option<Pubkey>) -> ListingsResult {
    let key = listings_key(seller.as_ref());
    LISTINGS_IN_FLIGHT.with(|in_flight| in_flight.invalidate(&key));
    load_listings(config, seller).await
}

/// Wait for a submitted write to confirm before the caller refetches.
///
/// A signature still pending after the last status check is passed through; the
/// next poll picks up the change once it lands.
///
/// # Errors
///
/// Passes `submitted` errors through unchanged; a landed-but-failed
/// transaction becomes [`MarketError::Rejected`].
pub async fn settle(config: &MarketConfig, submitted: Result<String, MarketError>) -> Result<String, MarketError> {
    let signature = submitted?;
    let rpc = BrowserRpc::new(&config.rpc_url);
    let session: MarketSession<'_, BrowserRpc, BrowserWallet> = MarketSession::new(&rpc, config.program_id);
    match session.await_confirmation(&signature, CONFIRM_ATTEMPTS, confirm_pause).await? {
        SignatureStatus::Failed(error) => Err(MarketError::Rejected { signature, error }),
        SignatureStatus::Pending => {
            #[cfg(feature = "hydrate")]
            log::warn!("transaction {signature} not confirmed yet");
            Ok(signature)
        }
        SignatureStatus::Confirmed | SignatureStatus::Finalized => Ok(signature),
    }
}

async fn confirm_pause() {
    #[cfg(feature = "hydrate")]
    gloo_timers::future::sleep(std::time::Duration::from_millis(CONFIRM_POLL_MS)).await;
    #[cfg(not(feature = "hydrate"))]
    let _ = CONFIRM_POLL_MS;
}

/// NFTs held by `owner`.
///
/// # Errors
///
/// Propagates RPC failures.
pub async fn load_owned(config: &MarketConfig, owner: Pubkey) -> Result<Vec<OwnedNft>, MarketError> {
    let rpc = BrowserRpc::new(&config.rpc_url);
    service::fetch_owned_nfts(&rpc, &BrowserGateway, &owner, &config.gateway_url).await
}

/// # Errors
///
/// Propagates RPC and decode failures.
pub async fn load_marketplace(config: &MarketConfig) -> Result<Option<MarketplaceAccount>, MarketError> {
    let rpc = BrowserRpc::new(&config.rpc_url);
    service::fetch_marketplace(&rpc, &config.program_id).await
}

fn session<'a>(
    rpc: &'a BrowserRpc,
    config: &MarketConfig,
    signer: Option<&'a BrowserWallet>,
) -> MarketSession<'a, BrowserRpc, BrowserWallet> {
    MarketSession::new(rpc, config.program_id).with_signer(signer)
}

/// # Errors
///
/// See [`MarketSession::purchase_nft`].
pub async fn purchase(config: &MarketConfig, wallet: Option<Pubkey>, listing: &ListingView) -> Result<String, MarketError> {
    let rpc = BrowserRpc::new(&config.rpc_url);
    let signer = wallet.map(BrowserWallet::new);
    session(&rpc, config, signer.as_ref()).purchase_nft(&listing.seller, &listing.mint).await
}

/// # Errors
///
/// See [`MarketSession::delist_nft`].
pub async fn delist(config: &MarketConfig, wallet: Option<Pubkey>, mint: Pubkey) -> Result<String, MarketError> {
    let rpc = BrowserRpc::new(&config.rpc_url);
    let signer = wallet.map(BrowserWallet::new);
    session(&rpc, config, signer.as_ref()).delist_nft(&mint).await
}

/// Listing form submission with raw field text.
///
/// # Errors
///
/// See [`MarketSession::submit_listing_form`].
pub async fn list(config: &MarketConfig, wallet: Option<Pubkey>, mint: &str, price_sol: &str) -> Result<String, MarketError> {
    let rpc = BrowserRpc::new(&config.rpc_url);
    let signer = wallet.map(BrowserWallet::new);
    session(&rpc, config, signer.as_ref()).submit_listing_form(mint, price_sol).await
}

/// # Errors
///
/// See [`MarketSession::initialize_marketplace`].
pub async fn initialize(config: &MarketConfig, wallet: Option<Pubkey>, name: &str, fee_bps: u16) -> Result<String, MarketError> {
    let rpc = BrowserRpc::new(&config.rpc_url);
    let signer = wallet.map(BrowserWallet::new);
    session(&rpc, config, signer.as_ref()).initialize_marketplace(name, fee_bps).await
}

/// # Errors
///
/// See [`MarketSession::update_fee`].
pub async fn update_fee(config: &MarketConfig, wallet: Option<Pubkey>, fee_bps: u16) -> Result<String, MarketError> {
    let rpc = BrowserRpc::new(&config.rpc_url);
    let signer = wallet.map(BrowserWallet::new);
    session(&rpc, config, signer.as_ref()).update_fee(fee_bps).await
}
