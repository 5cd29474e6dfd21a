//! Listing view model and the browse page's filter/sort pipeline.
//!
//! DESIGN
//! ======
//! A [`ListingView`] joins an on-chain listing account with its off-chain
//! metadata. The chain has no listing creation time, so `timestamp` is the
//! first time this client observed the listing; [`stamp_first_seen`] carries
//! it across polls so "newest" stays stable while a page is open.

#[cfg(test)]
#[path = "listings_test.rs"]
mod listings_test;

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::accounts::ListingAccount;
use crate::gateway::{Attribute, NftMetadata};
use crate::token_metadata::TokenMetadata;

pub const UNKNOWN_NAME: &str = "Unknown NFT";
pub const UNNAMED_NAME: &str = "Unnamed NFT";

/// Denormalized listing shown on a card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListingView {
    pub mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub attributes: Vec<Attribute>,
    pub seller: Pubkey,
    pub listing_account: Pubkey,
    /// Lamports.
    pub price: u64,
    /// Unix millis when this client first saw the listing.
    pub timestamp: u64,
}

impl ListingView {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.as_deref().is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// Join a listing with its metadata document. `None` means the fetch failed
/// and yields the placeholder view.
#[must_use]
pub fn denormalize(
    listing: &ListingAccount,
    listing_account: Pubkey,
    metadata: Option<NftMetadata>,
    timestamp: u64,
) -> ListingView {
    let base = ListingView {
        mint: listing.nft_mint,
        name: UNKNOWN_NAME.to_owned(),
        symbol: String::new(),
        description: None,
        image: None,
        attributes: Vec::new(),
        seller: listing.maker,
        listing_account,
        price: listing.price,
        timestamp,
    };
    match metadata {
        None => base,
        Some(doc) => ListingView {
            name: doc.name.filter(|n| !n.is_empty()).unwrap_or_else(|| UNNAMED_NAME.to_owned()),
            symbol: doc.symbol.unwrap_or_default(),
            description: doc.description,
            image: doc.image,
            attributes: doc.attributes.unwrap_or_default(),
            ..base
        },
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    PriceLowToHigh,
    PriceHighToLow,
    /// Keep fetch order.
    Unsorted,
}

impl SortOrder {
    pub const CHOICES: [SortOrder; 3] = [Self::Newest, Self::PriceLowToHigh, Self::PriceHighToLow];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceLowToHigh => "price-low",
            Self::PriceHighToLow => "price-high",
            Self::Unsorted => "unsorted",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest First",
            Self::PriceLowToHigh => "Price: Low to High",
            Self::PriceHighToLow => "Price: High to Low",
            Self::Unsorted => "Unsorted",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(Self::Newest),
            "price-low" => Ok(Self::PriceLowToHigh),
            "price-high" => Ok(Self::PriceHighToLow),
            "unsorted" => Ok(Self::Unsorted),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Case-insensitive search on name or description, then a stable sort.
#[must_use]
pub fn filter_and_sort(items: &[ListingView], search: &str, order: SortOrder) -> Vec<ListingView> {
    let needle = search.trim().to_lowercase();
    let mut out: Vec<ListingView> = items.iter().filter(|item| item.matches(&needle)).cloned().collect();
    match order {
        SortOrder::Newest => out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::PriceLowToHigh => out.sort_by_key(|item| item.price),
        SortOrder::PriceHighToLow => out.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOrder::Unsorted => {}
    }
    out
}

/// Keep the first-seen timestamp of listings already known from `previous`.
#[must_use]
pub fn stamp_first_seen(previous: &[ListingView], fresh: Vec<ListingView>) -> Vec<ListingView> {
    let seen: HashMap<Pubkey, u64> = previous.iter().map(|l| (l.listing_account, l.timestamp)).collect();
    fresh
        .into_iter()
        .map(|mut item| {
            if let Some(ts) = seen.get(&item.listing_account) {
                item.timestamp = *ts;
            }
            item
        })
        .collect()
}

/// Aggregates for the stats panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MarketStats {
    pub total_listed: usize,
    /// Sum of listed prices in lamports.
    pub total_volume: u64,
    pub floor_price: Option<u64>,
}

impl MarketStats {
    #[must_use]
    pub fn from_listings(items: &[ListingView]) -> Self {
        Self {
            total_listed: items.len(),
            total_volume: items.iter().fold(0u64, |acc, l| acc.saturating_add(l.price)),
            floor_price: items.iter().map(|l| l.price).min(),
        }
    }
}

/// An NFT held in the connected wallet, for the "owned" tab.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OwnedNft {
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub name: String,
    pub symbol: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub attributes: Vec<Attribute>,
}

impl OwnedNft {
    /// Merge on-chain token metadata with the off-chain document it points at.
    /// The document wins where both have a value.
    #[must_use]
    pub fn assemble(
        mint: Pubkey,
        token_account: Pubkey,
        on_chain: Option<&TokenMetadata>,
        document: Option<NftMetadata>,
    ) -> Self {
        let chain_name = on_chain.map(|m| m.name.clone()).filter(|n| !n.is_empty());
        let chain_symbol = on_chain.map(|m| m.symbol.clone()).unwrap_or_default();
        let fallback_name = || {
            let placeholder = if on_chain.is_some() { UNNAMED_NAME } else { UNKNOWN_NAME };
            chain_name.clone().unwrap_or_else(|| placeholder.to_owned())
        };
        match document {
            None => Self {
                mint,
                token_account,
                name: fallback_name(),
                symbol: chain_symbol,
                description: None,
                image: None,
                attributes: Vec::new(),
            },
            Some(doc) => Self {
                mint,
                token_account,
                name: doc.name.filter(|n| !n.is_empty()).unwrap_or_else(fallback_name),
                symbol: doc.symbol.filter(|s| !s.is_empty()).unwrap_or(chain_symbol),
                description: doc.description,
                image: doc.image,
                attributes: doc.attributes.unwrap_or_default(),
            },
        }
    }
}
