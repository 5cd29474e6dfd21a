//! Listed-count and volume summary above the browse grid.

#[cfg(test)]
#[path = "marketplace_stats_test.rs"]
mod marketplace_stats_test;

use leptos::prelude::*;
use market::format::format_sol;
use market::listings::MarketStats;

/// `(label, value)` rows in display order.
pub(crate) fn stat_rows(stats: &MarketStats) -> Vec<(&'static str, String)> {
    vec![
        ("Total NFTs", stats.total_listed.to_string()),
        ("Total Volume", format!("{} SOL", format_sol(stats.total_volume))),
        (
            "Floor Price",
            stats.floor_price.map_or_else(|| "-".to_owned(), |p| format!("{} SOL", format_sol(p))),
        ),
    ]
}

#[component]
pub fn MarketplaceStats(#[prop(into)] stats: Signal<MarketStats>) -> impl IntoView {
    view! {
        <div class="market-stats">
            {move || {
                stat_rows(&stats.get())
                    .into_iter()
                    .map(|(label, value)| {
                        view! {
                            <div class="market-stats__item">
                                <span class="market-stats__label">{label}</span>
                                <span class="market-stats__value">{value}</span>
                            </div>
                        }
                    })
                    .collect::<Vec<_>>()
            }}
        </div>
    }
}
