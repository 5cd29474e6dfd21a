//! Plain-text rendering for terminal output.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashSet;

use market::accounts::MarketplaceAccount;
use market::format::{format_fee_bps, format_sol, shorten_address};
use market::listings::{ListingView, MarketStats, OwnedNft};
use market::pda::ListingAddresses;
use market::rpc::SignatureStatus;

const NAME_WIDTH: usize = 24;
const SHORT_CHARS: usize = 4;

/// Pad or cut `text` to exactly `width` characters.
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return format!("{text:<width$}");
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn short(key: &impl ToString) -> String {
    shorten_address(&key.to_string(), SHORT_CHARS)
}

#[must_use]
pub fn listing_row(listing: &ListingView) -> String {
    format!(
        "{}  {:>10} SOL  seller {}  mint {}",
        fit(&listing.name, NAME_WIDTH),
        format_sol(listing.price),
        short(&listing.seller),
        listing.mint,
    )
}

#[must_use]
pub fn owned_row(nft: &OwnedNft) -> String {
    let symbol = if nft.symbol.is_empty() { "-" } else { nft.symbol.as_str() };
    format!("{}  {:<10}  mint {}", fit(&nft.name, NAME_WIDTH), fit(symbol, 10), nft.mint)
}

#[must_use]
pub fn stats_line(stats: &MarketStats) -> String {
    let floor = stats.floor_price.map_or_else(|| "-".to_owned(), |p| format!("{} SOL", format_sol(p)));
    format!(
        "{} listed, volume {} SOL, floor {floor}",
        stats.total_listed,
        format_sol(stats.total_volume),
    )
}

#[must_use]
pub fn marketplace_rows(market: &MarketplaceAccount) -> Vec<(&'static str, String)> {
    vec![
        ("name", market.name.clone()),
        ("authority", market.authority.to_string()),
        ("fee", format!("{} ({} bps)", format_fee_bps(market.fee_bps), market.fee_bps)),
        ("treasury", market.treasury.to_string()),
    ]
}

#[must_use]
pub fn address_rows(addresses: &ListingAddresses) -> Vec<(&'static str, String)> {
    vec![
        ("marketplace", addresses.marketplace.to_string()),
        ("treasury", addresses.treasury.to_string()),
        ("listing", addresses.listing.to_string()),
        ("vault", addresses.vault.to_string()),
        ("metadata", addresses.metadata.to_string()),
        ("master_edition", addresses.master_edition.to_string()),
    ]
}

/// `label: value` lines with the values aligned.
#[must_use]
pub fn aligned(rows: &[(&str, String)]) -> String {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(label, value)| format!("{label:<width$}  {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn status_label(status: &SignatureStatus) -> String {
    match status {
        SignatureStatus::Pending => "pending".to_owned(),
        SignatureStatus::Confirmed => "confirmed".to_owned(),
        SignatureStatus::Finalized => "finalized".to_owned(),
        SignatureStatus::Failed(err) => format!("failed: {err}"),
    }
}

/// Listings that appeared or disappeared between two polls, keyed by
/// listing account.
#[derive(Debug, Default, PartialEq)]
pub struct ListingDiff {
    pub added: Vec<ListingView>,
    pub removed: Vec<ListingView>,
}

impl ListingDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[must_use]
pub fn diff_listings(previous: &[ListingView], current: &[ListingView]) -> ListingDiff {
    let before: HashSet<_> = previous.iter().map(|l| l.listing_account).collect();
    let after: HashSet<_> = current.iter().map(|l| l.listing_account).collect();
    ListingDiff {
        added: current.iter().filter(|l| !before.contains(&l.listing_account)).cloned().collect(),
        removed: previous.iter().filter(|l| !after.contains(&l.listing_account)).cloned().collect(),
    }
}
