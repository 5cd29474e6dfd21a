use market::accounts::ListingAccount;
use market::gateway::NftMetadata;
use market::listings::denormalize;

use super::*;

fn view(seed: u8, name: &str, price: u64, ts: u64) -> ListingView {
    let listing = ListingAccount {
        maker: Pubkey::new_from_array([seed; 32]),
        nft_mint: Pubkey::new_from_array([seed; 32]),
        price,
        metadata: String::new(),
        bump: 0,
    };
    let doc = NftMetadata { name: Some(name.to_owned()), ..NftMetadata::default() };
    denormalize(&listing, Pubkey::new_from_array([seed; 32]), Some(doc), ts)
}

#[test]
fn visible_applies_search_and_sort() {
    let mut state = MarketState::default();
    state.apply_fetch(vec![view(1, "Alpha Cat", 30, 1), view(2, "Beta Dog", 10, 2), view(3, "Gamma Cat", 20, 3)]);
    state.search = "cat".to_owned();
    state.sort = SortOrder::PriceLowToHigh;
    let names: Vec<String> = state.visible().into_iter().map(|l| l.name).collect();
    assert_eq!(names, ["Gamma Cat", "Alpha Cat"]);
}

#[test]
fn refetch_keeps_first_seen_timestamp() {
    let mut state = MarketState::default();
    state.apply_fetch(vec![view(1, "a", 1, 100)]);
    state.apply_fetch(vec![view(1, "a", 1, 900), view(2, "b", 1, 900)]);
    assert_eq!(state.listings[0].timestamp, 100);
    assert_eq!(state.listings[1].timestamp, 900);
    assert!(state.loaded);
}

#[test]
fn fetch_error_clears_loading() {
    let mut state = MarketState { loading: true, ..MarketState::default() };
    state.apply_fetch_error("Failed to load listings".to_owned());
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Failed to load listings"));
}

#[test]
fn empty_message_depends_on_search() {
    let mut state = MarketState::default();
    assert!(state.empty_message().starts_with("No NFTs"));
    state.search = "zzz".to_owned();
    assert!(state.empty_message().starts_with("Try adjusting"));
}

#[test]
fn stats_cover_all_listings_not_just_visible() {
    let mut state = MarketState::default();
    state.apply_fetch(vec![view(1, "a", 5, 1), view(2, "b", 7, 1)]);
    state.search = "a".to_owned();
    assert_eq!(state.stats().total_listed, 2);
    assert_eq!(state.stats().total_volume, 12);
}
