//! Browse-page state: fetched listings plus the user's search and sort.

#[cfg(test)]
#[path = "market_test.rs"]
mod market_test;

use market::Pubkey;
use market::listings::{ListingView, MarketStats, SortOrder, filter_and_sort, stamp_first_seen};

use super::notice::Notice;

#[derive(Clone, Debug, Default)]
pub struct MarketState {
    pub listings: Vec<ListingView>,
    pub loading: bool,
    /// At least one fetch has completed.
    pub loaded: bool,
    pub error: Option<String>,
    pub search: String,
    pub sort: SortOrder,
    /// Listing shown in the purchase confirmation modal.
    pub confirming: Option<ListingView>,
    /// Listing account whose purchase or delist is in flight.
    pub acting: Option<Pubkey>,
    pub notice: Option<Notice>,
}

impl MarketState {
    /// Listings after the current search and sort.
    #[must_use]
    pub fn visible(&self) -> Vec<ListingView> {
        filter_and_sort(&self.listings, &self.search, self.sort)
    }

    #[must_use]
    pub fn stats(&self) -> MarketStats {
        MarketStats::from_listings(&self.listings)
    }

    /// Replace listings with a fresh fetch, keeping first-seen timestamps.
    pub fn apply_fetch(&mut self, fresh: Vec<ListingView>) {
        self.listings = stamp_first_seen(&self.listings, fresh);
        self.loading = false;
        self.loaded = true;
        self.error = None;
    }

    pub fn apply_fetch_error(&mut self, message: String) {
        self.loading = false;
        self.loaded = true;
        self.error = Some(message);
    }

    #[must_use]
    pub fn is_acting(&self) -> bool {
        self.acting.is_some()
    }

    /// Empty-grid text; differs when a search is active.
    #[must_use]
    pub fn empty_message(&self) -> &'static str {
        if self.search.trim().is_empty() {
            "No NFTs are currently listed for sale. Check back soon for new listings!"
        } else {
            "Try adjusting your search terms or browse all available NFTs"
        }
    }
}
