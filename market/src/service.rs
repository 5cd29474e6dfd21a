//! Marketplace operations over an explicit session context.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reads need only an RPC transport and, for metadata, a [`MetadataSource`].
//! Writes additionally need a [`WalletSigner`]. [`MarketSession`] bundles the
//! transport, the optional signer, and the program id so each page passes one
//! value instead of reaching for globals.
//!
//! DESIGN
//! ======
//! Every write follows the same pipeline: check the wallet, validate inputs,
//! derive addresses, build the instruction, fetch a blockhash, sign, send,
//! return the signature. Validation happens before the first network call, so
//! a rejected form value never reaches the endpoint. There is no retry; the
//! caller decides whether to resubmit.
//!
//! ERROR HANDLING
//! ==============
//! A listing whose account data does not decode is skipped with a warning. A
//! listing whose metadata fetch fails is still shown, with placeholder text.
//! Everything else propagates as [`MarketError`].

#[cfg(test)]
#[path = "service_test.rs"]
mod service_test;

use std::future::Future;

use futures::future::join_all;
use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use tracing::{info, warn};

use crate::accounts::{ListingAccount, MarketplaceAccount, listing_filters};
use crate::error::MarketError;
use crate::gateway::{MetadataSource, metadata_url};
use crate::instructions;
use crate::listings::{ListingView, OwnedNft, denormalize};
use crate::pda::{listing_address, marketplace_address, metadata_address};
use crate::rpc::{self, RpcTransport, SignatureStatus};
use crate::signer::WalletSigner;
use crate::token_metadata::TokenMetadata;
use crate::transaction;
use crate::validation::{parse_mint, parse_price_sol, validate_fee, validate_name, validate_price};

/// Active listings, optionally only those made by `seller`.
///
/// `now` (unix millis) becomes each view's timestamp; see
/// [`crate::listings::stamp_first_seen`] for carrying it across polls.
///
/// # Errors
///
/// Fails only if the account scan itself fails.
pub async fn fetch_listings<T, M>(
    transport: &T,
    source: &M,
    program_id: &Pubkey,
    gateway_url: &str,
    seller: Option<&Pubkey>,
    now: u64,
) -> Result<Vec<ListingView>, MarketError>
where
    T: RpcTransport + ?Sized,
    M: MetadataSource + ?Sized,
{
    let accounts = rpc::get_program_accounts(transport, program_id, &listing_filters(seller)).await?;
    let decoded: Vec<(Pubkey, ListingAccount)> = accounts
        .into_iter()
        .filter_map(|account| match ListingAccount::decode(&account.data) {
            Ok(listing) => Some((account.pubkey, listing)),
            Err(e) => {
                warn!(account = %account.pubkey, error = %e, "skipping undecodable listing");
                None
            }
        })
        .collect();

    let views = decoded.iter().map(|(address, listing)| async move {
        let url = metadata_url(gateway_url, &listing.metadata);
        let metadata = match source.fetch_metadata(&url).await {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(listing = %address, %url, error = %e, "metadata fetch failed");
                None
            }
        };
        denormalize(listing, *address, metadata, now)
    });
    Ok(join_all(views).await)
}

/// The marketplace configuration account, `None` before initialization.
///
/// # Errors
///
/// Propagates RPC errors and decode failures of an existing account.
pub async fn fetch_marketplace<T: RpcTransport + ?Sized>(
    transport: &T,
    program_id: &Pubkey,
) -> Result<Option<MarketplaceAccount>, MarketError> {
    let address = marketplace_address(program_id);
    match rpc::get_account(transport, &address).await? {
        Some(data) => Ok(Some(MarketplaceAccount::decode(&data)?)),
        None => Ok(None),
    }
}

/// The active listing of `mint`, `None` when it is not listed.
///
/// # Errors
///
/// Propagates RPC errors and decode failures of an existing account.
pub async fn fetch_listing<T: RpcTransport + ?Sized>(
    transport: &T,
    program_id: &Pubkey,
    mint: &Pubkey,
) -> Result<Option<ListingAccount>, MarketError> {
    let address = listing_address(program_id, mint);
    match rpc::get_account(transport, &address).await? {
        Some(data) => Ok(Some(ListingAccount::decode(&data)?)),
        None => Ok(None),
    }
}

/// NFTs held by `owner`: token balances of exactly one indivisible unit,
/// joined with their token-metadata account and off-chain document.
///
/// # Errors
///
/// Propagates RPC errors from the balance and metadata-account reads. Missing
/// or undecodable metadata degrades to placeholder text.
pub async fn fetch_owned_nfts<T, M>(
    transport: &T,
    source: &M,
    owner: &Pubkey,
    gateway_url: &str,
) -> Result<Vec<OwnedNft>, MarketError>
where
    T: RpcTransport + ?Sized,
    M: MetadataSource + ?Sized,
{
    let held: Vec<_> = rpc::get_token_accounts_by_owner(transport, owner)
        .await?
        .into_iter()
        .filter(rpc::TokenBalance::is_nft)
        .collect();
    let metadata_keys: Vec<Pubkey> = held.iter().map(|b| metadata_address(&b.mint)).collect();
    let metadata_accounts = rpc::get_multiple_accounts(transport, &metadata_keys).await?;

    let items = held.iter().zip(metadata_accounts).map(|(balance, data)| async move {
        let on_chain = data.and_then(|bytes| match TokenMetadata::decode(&bytes) {
            Ok(meta) => Some(meta),
            Err(e) => {
                warn!(mint = %balance.mint, error = %e, "undecodable token metadata");
                None
            }
        });
        let document = match on_chain.as_ref().map(|m| m.uri.as_str()).filter(|uri| !uri.is_empty()) {
            Some(uri) => source
                .fetch_metadata(&metadata_url(gateway_url, uri))
                .await
                .inspect_err(|e| warn!(mint = %balance.mint, error = %e, "metadata fetch failed"))
                .ok(),
            None => None,
        };
        OwnedNft::assemble(balance.mint, balance.account, on_chain.as_ref(), document)
    });
    Ok(join_all(items).await)
}

/// Explicit session context: endpoint, optional wallet, program id.
pub struct MarketSession<'a, T: ?Sized, S: ?Sized> {
    transport: &'a T,
    signer: Option<&'a S>,
    program_id: Pubkey,
}

impl<T: ?Sized, S: ?Sized> Clone for MarketSession<'_, T, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized, S: ?Sized> Copy for MarketSession<'_, T, S> {}

impl<'a, T, S> MarketSession<'a, T, S>
where
    T: RpcTransport + ?Sized,
    S: WalletSigner + ?Sized,
{
    #[must_use]
    pub fn new(transport: &'a T, program_id: Pubkey) -> Self {
        Self { transport, signer: None, program_id }
    }

    #[must_use]
    pub fn with_signer(mut self, signer: Option<&'a S>) -> Self {
        self.signer = signer;
        self
    }

    #[must_use]
    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    #[must_use]
    pub fn transport(&self) -> &'a T {
        self.transport
    }

    /// Connected wallet key, if any.
    #[must_use]
    pub fn wallet(&self) -> Option<Pubkey> {
        self.signer.map(WalletSigner::pubkey)
    }

    fn require_signer(&self) -> Result<&'a S, MarketError> {
        self.signer.ok_or(MarketError::WalletNotConnected)
    }

    async fn submit(&self, signer: &S, instruction: Instruction, action: &'static str) -> Result<String, MarketError> {
        let payer = signer.pubkey();
        let blockhash = rpc::get_latest_blockhash(self.transport).await?;
        let unsigned = transaction::new_unsigned(&[instruction], &payer, &blockhash);
        let signed = signer.sign_transaction(unsigned).await?;
        if !signed.is_signed() {
            return Err(MarketError::Signer("wallet returned an unsigned transaction".to_owned()));
        }
        let signature = rpc::send_transaction(self.transport, &signed).await.inspect_err(|e| {
            warn!(action, error = %e, "transaction rejected");
        })?;
        info!(action, %payer, %signature, "transaction submitted");
        Ok(signature)
    }

    /// Move `mint` from the wallet into escrow at `price` lamports.
    ///
    /// # Errors
    ///
    /// [`MarketError::WalletNotConnected`] or a validation error before any
    /// network call; otherwise RPC or signer errors.
    pub async fn list_nft(&self, mint: &Pubkey, price: u64) -> Result<String, MarketError> {
        let signer = self.require_signer()?;
        let price = validate_price(price)?;
        let ix = instructions::list_nft(&self.program_id, &signer.pubkey(), mint, price)?;
        self.submit(signer, ix, instructions::LIST_NFT).await
    }

    /// Listing form entry point: parses the raw mint and SOL price text.
    ///
    /// # Errors
    ///
    /// See [`MarketSession::list_nft`].
    pub async fn submit_listing_form(&self, mint: &str, price_sol: &str) -> Result<String, MarketError> {
        self.require_signer()?;
        let mint = parse_mint(mint)?;
        let price = parse_price_sol(price_sol)?;
        self.list_nft(&mint, price).await
    }

    /// Buy the listing of `mint` made by `seller`.
    ///
    /// # Errors
    ///
    /// [`MarketError::WalletNotConnected`] before any network call; otherwise
    /// RPC or signer errors.
    pub async fn purchase_nft(&self, seller: &Pubkey, mint: &Pubkey) -> Result<String, MarketError> {
        let signer = self.require_signer()?;
        let ix = instructions::purchase_nft(&self.program_id, &signer.pubkey(), seller, mint)?;
        self.submit(signer, ix, instructions::PURCHASE_NFT).await
    }

    /// Close the wallet's listing of `mint` and return the token.
    ///
    /// # Errors
    ///
    /// [`MarketError::WalletNotConnected`] before any network call; otherwise
    /// RPC or signer errors.
    pub async fn delist_nft(&self, mint: &Pubkey) -> Result<String, MarketError> {
        let signer = self.require_signer()?;
        let ix = instructions::delist_nft(&self.program_id, &signer.pubkey(), mint)?;
        self.submit(signer, ix, instructions::DELIST_NFT).await
    }

    /// Create the marketplace account with the wallet as admin.
    ///
    /// # Errors
    ///
    /// Name or fee validation errors before any network call; otherwise RPC
    /// or signer errors.
    pub async fn initialize_marketplace(&self, name: &str, fee_bps: u16) -> Result<String, MarketError> {
        let signer = self.require_signer()?;
        let name = validate_name(name)?;
        let fee = validate_fee(fee_bps)?;
        let ix = instructions::initialize_marketplace(&self.program_id, &signer.pubkey(), name, fee)?;
        self.submit(signer, ix, instructions::INITIALIZE_MARKETPLACE).await
    }

    /// # Errors
    ///
    /// Fee validation errors before any network call; otherwise RPC or
    /// signer errors.
    pub async fn update_fee(&self, fee_bps: u16) -> Result<String, MarketError> {
        let signer = self.require_signer()?;
        let fee = validate_fee(fee_bps)?;
        let ix = instructions::update_fee(&self.program_id, &signer.pubkey(), fee)?;
        self.submit(signer, ix, instructions::UPDATE_FEE).await
    }

    /// One status check for a submitted signature.
    ///
    /// # Errors
    ///
    /// Propagates RPC errors.
    pub async fn confirm(&self, signature: &str) -> Result<SignatureStatus, MarketError> {
        Ok(rpc::get_signature_status(self.transport, signature).await?)
    }

    /// Check up to `attempts` times, awaiting `pause` between checks, until
    /// the signature leaves [`SignatureStatus::Pending`]. Still pending after
    /// the last check is returned as `Pending`, not an error.
    ///
    /// # Errors
    ///
    /// Propagates RPC errors.
    pub async fn await_confirmation<P, Fut>(
        &self,
        signature: &str,
        attempts: u32,
        mut pause: P,
    ) -> Result<SignatureStatus, MarketError>
    where
        P: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        for attempt in 0..attempts {
            if attempt > 0 {
                pause().await;
            }
            let status = self.confirm(signature).await?;
            if status != SignatureStatus::Pending {
                info!(%signature, ?status, attempt, "transaction settled");
                return Ok(status);
            }
        }
        warn!(%signature, attempts, "transaction still pending");
        Ok(SignatureStatus::Pending)
    }
}
