//! Browse page: active listings with search, sort, and purchase.
//!
//! SYSTEM CONTEXT
//! ==============
//! The landing route. Listings are fetched when a wallet connects, refreshed
//! on a fixed poll while the page is mounted, and refetched after every
//! purchase or delist once it confirms. Overlapping polls share one request;
//! the refetch after a write never joins a poll that started before it.

use leptos::prelude::*;
use market::config::MarketConfig;
use market::listings::{ListingView, SortOrder};

use crate::components::marketplace_stats::MarketplaceStats;
use crate::components::nft_card::{CardAction, ListingCard};
use crate::components::notice_banner::NoticeBanner;
use crate::components::purchase_modal::PurchaseModal;
use crate::components::wallet_gate::WalletGate;
use crate::state::market::MarketState;
use crate::state::wallet::WalletState;

#[component]
pub fn MarketplacePage() -> impl IntoView {
    let state = expect_context::<RwSignal<MarketState>>();
    let wallet = expect_context::<RwSignal<WalletState>>();
    let config = expect_context::<MarketConfig>();

    // Fetch as soon as a wallet is connected, then on a fixed poll.
    #[cfg(feature = "hydrate")]
    {
        let effect_config = config.clone();
        Effect::new(move || {
            if !wallet.get().is_connected() {
                return;
            }
            let config = effect_config.clone();
            leptos::task::spawn_local(async move { refresh(&config, state).await });
        });
    }

    #[cfg(feature = "hydrate")]
    {
        let config = config.clone();
        let poll_alive = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        let poll_alive_task = poll_alive.clone();
        leptos::task::spawn_local(async move {
            loop {
                gloo_timers::future::sleep(std::time::Duration::from_secs(crate::config::LISTINGS_POLL_SECS)).await;
                if !poll_alive_task.load(std::sync::atomic::Ordering::Relaxed) {
                    break;
                }
                if !wallet.get_untracked().is_connected() {
                    continue;
                }
                refresh(&config, state).await;
            }
        });
        on_cleanup(move || poll_alive.store(false, std::sync::atomic::Ordering::Relaxed));
    }

    let action_config = config.clone();
    let on_card_action = Callback::new(move |listing: ListingView| {
        if state.get_untracked().is_acting() {
            return;
        }
        let own = wallet.get_untracked().pubkey == Some(listing.seller);
        if own {
            delist(&action_config, state, wallet, listing);
        } else {
            state.update(|m| m.confirming = Some(listing));
        }
    });
    let on_confirm = Callback::new(move |listing: ListingView| purchase(&config, state, wallet, listing));
    let on_cancel = Callback::new(move |()| state.update(|m| m.confirming = None));
    let on_dismiss = Callback::new(move |()| state.update(|m| m.notice = None));

    view! {
        <WalletGate
            title="Connect Your Wallet"
            message="Please connect your wallet to explore and purchase NFTs from our marketplace"
        >
            <div class="marketplace-page">
                <header class="page-header">
                    <h1>"NFT Marketplace"</h1>
                    <p>"Discover, collect, and trade unique digital assets on Solana"</p>
                </header>
                <NoticeBanner notice=Signal::derive(move || state.get().notice) on_dismiss=on_dismiss />
                <MarketplaceStats stats=Signal::derive(move || state.get().stats()) />
                <div class="marketplace-page__controls">
                    <input
                        class="marketplace-page__search"
                        type="text"
                        placeholder="Search NFTs by name or description..."
                        prop:value=move || state.get().search
                        on:input=move |ev| state.update(|m| m.search = event_target_value(&ev))
                    />
                    <select
                        class="marketplace-page__sort"
                        prop:value=move || state.get().sort.as_str()
                        on:change=move |ev| {
                            if let Ok(order) = event_target_value(&ev).parse::<SortOrder>() {
                                state.update(|m| m.sort = order);
                            }
                        }
                    >
                        {SortOrder::CHOICES
                            .into_iter()
                            .map(|order| view! { <option value=order.as_str()>{order.label()}</option> })
                            .collect::<Vec<_>>()}
                    </select>
                </div>
                <Show when=move || state.get().error.is_some()>
                    <p class="marketplace-page__error">{move || state.get().error.unwrap_or_default()}</p>
                </Show>
                <Show
                    when=move || state.get().loaded
                    fallback=move || view! { <p class="marketplace-page__loading">"Loading listings..."</p> }
                >
                    <ListingGrid on_action=on_card_action />
                </Show>
                {move || {
                    state
                        .get()
                        .confirming
                        .map(|listing| {
                            let busy = Signal::derive(move || state.get().is_acting());
                            view! { <PurchaseModal listing=listing busy=busy on_confirm=on_confirm on_cancel=on_cancel /> }
                        })
                }}
            </div>
        </WalletGate>
    }
}

#[component]
fn ListingGrid(on_action: Callback<ListingView>) -> impl IntoView {
    let state = expect_context::<RwSignal<MarketState>>();
    let wallet = expect_context::<RwSignal<WalletState>>();

    view! {
        {move || {
            let snapshot = state.get();
            let visible = snapshot.visible();
            if visible.is_empty() {
                return view! { <p class="marketplace-page__empty">{snapshot.empty_message()}</p> }.into_any();
            }
            let me = wallet.get().pubkey;
            view! {
                <div class="nft-grid">
                    {visible
                        .into_iter()
                        .map(|listing| {
                            let account = listing.listing_account;
                            let action = if me == Some(listing.seller) { CardAction::Delist } else { CardAction::Buy };
                            let busy = Signal::derive(move || state.get().acting == Some(account));
                            let disabled = Signal::derive(move || state.get().is_acting());
                            view! { <ListingCard listing=listing action=action busy=busy disabled=disabled on_action=on_action /> }
                        })
                        .collect::<Vec<_>>()}
                </div>
            }
            .into_any()
        }}
    }
}

#[cfg(feature = "hydrate")]
async fn refresh(config: &MarketConfig, state: RwSignal<MarketState>) {
    state.update(|m| m.loading = true);
    apply_listings(state, crate::net::market::load_listings(config, None).await);
}

/// Refetch once a write has settled, skipping any fetch already running.
#[cfg(feature = "hydrate")]
async fn refresh_after_write(config: &MarketConfig, state: RwSignal<MarketState>) {
    state.update(|m| m.loading = true);
    apply_listings(state, crate::net::market::reload_listings(config, None).await);
}

#[cfg(feature = "hydrate")]
fn apply_listings(state: RwSignal<MarketState>, result: Result<Vec<ListingView>, market::MarketError>) {
    match result {
        Ok(items) => state.update(|m| m.apply_fetch(items)),
        Err(e) => {
            log::error!("listing fetch failed: {e}");
            let text = market::error::user_message(&e, "Failed to load listings");
            state.update(|m| m.apply_fetch_error(text));
        }
    }
}

fn purchase(config: &MarketConfig, state: RwSignal<MarketState>, wallet: RwSignal<WalletState>, listing: ListingView) {
    if state.get_untracked().is_acting() {
        return;
    }
    state.update(|m| {
        m.acting = Some(listing.listing_account);
        m.notice = None;
    });
    #[cfg(feature = "hydrate")]
    {
        let config = config.clone();
        let key = wallet.get_untracked().pubkey;
        leptos::task::spawn_local(async move {
            let submitted = crate::net::market::purchase(&config, key, &listing).await;
            let result = crate::net::market::settle(&config, submitted).await;
            finish_action(state, result, "NFT purchased successfully!", "Failed to purchase NFT");
            refresh_after_write(&config, state).await;
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, wallet, listing);
        state.update(|m| m.acting = None);
    }
}

fn delist(config: &MarketConfig, state: RwSignal<MarketState>, wallet: RwSignal<WalletState>, listing: ListingView) {
    state.update(|m| {
        m.acting = Some(listing.listing_account);
        m.notice = None;
    });
    #[cfg(feature = "hydrate")]
    {
        let config = config.clone();
        let key = wallet.get_untracked().pubkey;
        leptos::task::spawn_local(async move {
            let submitted = crate::net::market::delist(&config, key, listing.mint).await;
            let result = crate::net::market::settle(&config, submitted).await;
            finish_action(state, result, "NFT delisted successfully!", "Failed to delist NFT");
            refresh_after_write(&config, state).await;
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, wallet, listing);
        state.update(|m| m.acting = None);
    }
}

#[cfg(feature = "hydrate")]
fn finish_action(
    state: RwSignal<MarketState>,
    result: Result<String, market::MarketError>,
    success: &str,
    fallback: &str,
) {
    use crate::state::notice::Notice;
    let notice = match result {
        Ok(signature) => {
            log::info!("transaction submitted: {signature}");
            Notice::success(success)
        }
        Err(e) => {
            log::error!("{fallback}: {e}");
            Notice::from_error(&e, fallback)
        }
    };
    state.update(|m| {
        m.acting = None;
        m.confirming = None;
        m.notice = Some(notice);
    });
}
