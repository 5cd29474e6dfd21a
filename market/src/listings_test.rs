use super::*;

fn listing(seed: u8, price: u64) -> ListingAccount {
    ListingAccount {
        maker: Pubkey::new_from_array([seed; 32]),
        nft_mint: Pubkey::new_from_array([seed.wrapping_add(100); 32]),
        price,
        metadata: format!("Qm{seed}"),
        bump: 255,
    }
}

fn view(seed: u8, name: &str, price: u64, timestamp: u64) -> ListingView {
    let doc = NftMetadata { name: Some(name.to_owned()), ..NftMetadata::default() };
    denormalize(&listing(seed, price), Pubkey::new_from_array([seed; 32]), Some(doc), timestamp)
}

fn names(items: &[ListingView]) -> Vec<&str> {
    items.iter().map(|l| l.name.as_str()).collect()
}

#[test]
fn failed_metadata_yields_placeholder() {
    let v = denormalize(&listing(1, 5), Pubkey::new_from_array([9; 32]), None, 10);
    assert_eq!(v.name, "Unknown NFT");
    assert_eq!(v.symbol, "");
    assert!(v.description.is_none());
    assert!(v.image.is_none());
    assert_eq!(v.price, 5);
    assert_eq!(v.seller, Pubkey::new_from_array([1; 32]));
}

#[test]
fn nameless_metadata_is_unnamed() {
    let v = denormalize(&listing(1, 5), Pubkey::new_from_array([9; 32]), Some(NftMetadata::default()), 10);
    assert_eq!(v.name, "Unnamed NFT");
}

#[test]
fn search_is_case_insensitive_over_name_and_description() {
    let mut b = view(2, "Dog", 1, 0);
    b.description = Some("A friendly CAT lover".to_owned());
    let items = vec![view(1, "Cool Cat", 1, 0), b, view(3, "Bird", 1, 0)];
    assert_eq!(names(&filter_and_sort(&items, "cat", SortOrder::Unsorted)), ["Cool Cat", "Dog"]);
    assert_eq!(filter_and_sort(&items, "", SortOrder::Unsorted).len(), 3);
    assert!(filter_and_sort(&items, "zebra", SortOrder::Unsorted).is_empty());
}

#[test]
fn sort_orders() {
    let items = vec![view(1, "a", 30, 1), view(2, "b", 10, 3), view(3, "c", 20, 2)];
    assert_eq!(names(&filter_and_sort(&items, "", SortOrder::Newest)), ["b", "c", "a"]);
    assert_eq!(names(&filter_and_sort(&items, "", SortOrder::PriceLowToHigh)), ["b", "c", "a"]);
    assert_eq!(names(&filter_and_sort(&items, "", SortOrder::PriceHighToLow)), ["a", "c", "b"]);
    assert_eq!(names(&filter_and_sort(&items, "", SortOrder::Unsorted)), ["a", "b", "c"]);
}

#[test]
fn ties_keep_input_order() {
    let items = vec![view(1, "first", 10, 5), view(2, "second", 10, 5), view(3, "third", 10, 5)];
    for order in SortOrder::CHOICES {
        assert_eq!(names(&filter_and_sort(&items, "", order)), ["first", "second", "third"], "{order:?}");
    }
}

#[test]
fn filter_and_sort_is_idempotent() {
    let items = vec![view(1, "a", 30, 1), view(2, "b", 10, 3), view(3, "c", 10, 2), view(4, "d", 20, 3)];
    for order in [SortOrder::Newest, SortOrder::PriceLowToHigh, SortOrder::PriceHighToLow, SortOrder::Unsorted] {
        let once = filter_and_sort(&items, "", order);
        assert_eq!(filter_and_sort(&once, "", order), once);
    }
}

#[test]
fn sorted_output_is_consistent_with_comparator() {
    let items: Vec<ListingView> = (0..20u8).map(|i| view(i, "x", u64::from(i * 7 % 5), u64::from(i % 3))).collect();
    let low = filter_and_sort(&items, "", SortOrder::PriceLowToHigh);
    assert!(low.windows(2).all(|w| w[0].price <= w[1].price));
    let newest = filter_and_sort(&items, "", SortOrder::Newest);
    assert!(newest.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
}

#[test]
fn sort_order_round_trips_through_str() {
    for order in [SortOrder::Newest, SortOrder::PriceLowToHigh, SortOrder::PriceHighToLow, SortOrder::Unsorted] {
        assert_eq!(order.as_str().parse::<SortOrder>(), Ok(order));
    }
    assert!("oldest".parse::<SortOrder>().is_err());
}

#[test]
fn first_seen_timestamps_survive_refresh() {
    let previous = vec![view(1, "a", 1, 100)];
    let fresh = vec![view(1, "a", 1, 500), view(2, "b", 1, 500)];
    let stamped = stamp_first_seen(&previous, fresh);
    assert_eq!(stamped[0].timestamp, 100);
    assert_eq!(stamped[1].timestamp, 500);
}

#[test]
fn stats_sum_and_floor() {
    let items = vec![view(1, "a", 30, 1), view(2, "b", 10, 3)];
    let stats = MarketStats::from_listings(&items);
    assert_eq!(stats.total_listed, 2);
    assert_eq!(stats.total_volume, 40);
    assert_eq!(stats.floor_price, Some(10));
    assert_eq!(MarketStats::from_listings(&[]), MarketStats::default());
}

fn token_metadata(name: &str, symbol: &str) -> TokenMetadata {
    TokenMetadata {
        update_authority: Pubkey::new_from_array([1; 32]),
        mint: Pubkey::new_from_array([2; 32]),
        name: name.to_owned(),
        symbol: symbol.to_owned(),
        uri: String::new(),
    }
}

#[test]
fn owned_nft_prefers_document_fields() {
    let doc = NftMetadata {
        name: Some("Doc Name".to_owned()),
        image: Some("https://img".to_owned()),
        ..NftMetadata::default()
    };
    let chain = token_metadata("Chain Name", "CHN");
    let nft = OwnedNft::assemble(chain.mint, Pubkey::new_from_array([3; 32]), Some(&chain), Some(doc));
    assert_eq!(nft.name, "Doc Name");
    assert_eq!(nft.symbol, "CHN");
    assert_eq!(nft.image.as_deref(), Some("https://img"));
}

#[test]
fn owned_nft_falls_back_to_chain_then_placeholder() {
    let chain = token_metadata("Chain Name", "CHN");
    let mint = chain.mint;
    let account = Pubkey::new_from_array([3; 32]);
    assert_eq!(OwnedNft::assemble(mint, account, Some(&chain), None).name, "Chain Name");
    assert_eq!(OwnedNft::assemble(mint, account, Some(&token_metadata("", "")), None).name, "Unnamed NFT");
    let unknown = OwnedNft::assemble(mint, account, None, None);
    assert_eq!(unknown.name, "Unknown NFT");
    assert_eq!(unknown.symbol, "");
}
