//! "My NFTs" page state: owned and listed tabs.

#[cfg(test)]
#[path = "my_nfts_test.rs"]
mod my_nfts_test;

use market::Pubkey;
use market::listings::{ListingView, OwnedNft, stamp_first_seen};

use super::notice::Notice;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NftTab {
    #[default]
    Owned,
    Listed,
}

#[derive(Clone, Debug, Default)]
pub struct MyNftsState {
    pub tab: NftTab,
    pub owned: Vec<OwnedNft>,
    pub listed: Vec<ListingView>,
    pub loading: bool,
    pub error: Option<String>,
    pub show_listing_form: bool,
    /// Mint whose delist is in flight.
    pub delisting: Option<Pubkey>,
    /// Mint to pre-fill in the listing form.
    pub prefill_mint: Option<Pubkey>,
    pub notice: Option<Notice>,
}

impl MyNftsState {
    pub fn apply_fetch(&mut self, owned: Vec<OwnedNft>, listed: Vec<ListingView>) {
        self.owned = owned;
        self.listed = stamp_first_seen(&self.listed, listed);
        self.loading = false;
        self.error = None;
    }

    /// Open the listing form, optionally pre-filled with an owned mint.
    pub fn open_listing_form(&mut self, mint: Option<Pubkey>) {
        self.prefill_mint = mint;
        self.show_listing_form = true;
    }

    pub fn close_listing_form(&mut self) {
        self.prefill_mint = None;
        self.show_listing_form = false;
    }

    #[must_use]
    pub fn tab_label(&self, tab: NftTab) -> String {
        match tab {
            NftTab::Owned => format!("Owned ({})", self.owned.len()),
            NftTab::Listed => format!("Listed ({})", self.listed.len()),
        }
    }
}
