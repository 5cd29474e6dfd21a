//! "My NFTs" page: held NFTs, the wallet's own listings, and the listing form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owned NFTs come from the wallet's token accounts; listed NFTs are the
//! program's listing accounts filtered by seller. Both are refetched after a
//! listing or delist confirms.

use leptos::prelude::*;
use market::Pubkey;
use market::config::MarketConfig;
use market::listings::ListingView;

use crate::components::listing_form::{ListingForm, ListingOutcome};
use crate::components::nft_card::{CardAction, ListingCard, OwnedNftCard};
use crate::components::notice_banner::NoticeBanner;
use crate::components::wallet_gate::WalletGate;
use crate::state::my_nfts::{MyNftsState, NftTab};
use crate::state::notice::Notice;
use crate::state::wallet::WalletState;

#[component]
pub fn MyNftsPage() -> impl IntoView {
    let state = expect_context::<RwSignal<MyNftsState>>();
    let wallet = expect_context::<RwSignal<WalletState>>();
    let config = expect_context::<MarketConfig>();

    #[cfg(feature = "hydrate")]
    {
        let effect_config = config.clone();
        Effect::new(move || {
            let Some(owner) = wallet.get().pubkey else {
                return;
            };
            let config = effect_config.clone();
            leptos::task::spawn_local(async move { refresh(&config, state, owner, false).await });
        });
    }

    let on_list_owned = Callback::new(move |mint: Pubkey| state.update(|s| s.open_listing_form(Some(mint))));
    let on_cancel_form = Callback::new(move |()| state.update(MyNftsState::close_listing_form));
    let on_dismiss = Callback::new(move |()| state.update(|s| s.notice = None));

    let success_config = config.clone();
    let on_listed = Callback::new(move |outcome: ListingOutcome| {
        #[cfg(feature = "hydrate")]
        log::info!("listing submitted: {}", outcome.signature);
        let text = match outcome.metadata_url {
            Some(url) => format!("NFT listed successfully! Metadata: {url}"),
            None => "NFT listed successfully!".to_owned(),
        };
        state.update(|s| {
            s.close_listing_form();
            s.notice = Some(Notice::success(text));
        });
        reload(&success_config, state, wallet);
    });

    let on_delist = Callback::new(move |listing: ListingView| delist(&config, state, wallet, listing));

    view! {
        <WalletGate
            title="Connect Your Wallet"
            message="Please connect your wallet to view and manage your NFT collection"
        >
            <Show
                when=move || !state.get().show_listing_form
                fallback=move || {
                    view! {
                        <ListingForm
                            prefill=state.get_untracked().prefill_mint
                            on_success=on_listed
                            on_cancel=on_cancel_form
                        />
                    }
                }
            >
                <div class="my-nfts-page">
                    <header class="page-header">
                        <h1>"My NFTs"</h1>
                        <button class="btn btn--primary" on:click=move |_| state.update(|s| s.open_listing_form(None))>
                            "List New NFT"
                        </button>
                    </header>
                    <NoticeBanner notice=Signal::derive(move || state.get().notice) on_dismiss=on_dismiss />
                    <div class="tabs" role="tablist">
                        <TabButton state=state tab=NftTab::Owned />
                        <TabButton state=state tab=NftTab::Listed />
                    </div>
                    <Show when=move || state.get().error.is_some()>
                        <p class="my-nfts-page__error">{move || state.get().error.unwrap_or_default()}</p>
                    </Show>
                    <Show
                        when=move || !state.get().loading
                        fallback=move || view! { <p class="my-nfts-page__loading">"Loading your NFTs..."</p> }
                    >
                        {move || match state.get().tab {
                            NftTab::Owned => view! { <OwnedGrid state=state on_list=on_list_owned /> }.into_any(),
                            NftTab::Listed => view! { <ListedGrid state=state on_delist=on_delist /> }.into_any(),
                        }}
                    </Show>
                </div>
            </Show>
        </WalletGate>
    }
}

#[component]
fn TabButton(state: RwSignal<MyNftsState>, tab: NftTab) -> impl IntoView {
    view! {
        <button
            class="tabs__tab"
            class:tabs__tab--active=move || state.get().tab == tab
            role="tab"
            on:click=move |_| state.update(|s| s.tab = tab)
        >
            {move || state.get().tab_label(tab)}
        </button>
    }
}

#[component]
fn OwnedGrid(state: RwSignal<MyNftsState>, on_list: Callback<Pubkey>) -> impl IntoView {
    view! {
        {move || {
            let owned = state.get().owned;
            if owned.is_empty() {
                return view! { <p class="my-nfts-page__empty">"No NFTs found in this wallet."</p> }.into_any();
            }
            view! {
                <div class="nft-grid">
                    {owned
                        .into_iter()
                        .map(|nft| view! { <OwnedNftCard nft=nft on_list=on_list /> })
                        .collect::<Vec<_>>()}
                </div>
            }
            .into_any()
        }}
    }
}

#[component]
fn ListedGrid(state: RwSignal<MyNftsState>, on_delist: Callback<ListingView>) -> impl IntoView {
    view! {
        {move || {
            let listed = state.get().listed;
            if listed.is_empty() {
                return view! { <p class="my-nfts-page__empty">"You have no active listings."</p> }.into_any();
            }
            view! {
                <div class="nft-grid">
                    {listed
                        .into_iter()
                        .map(|listing| {
                            let mint = listing.mint;
                            let busy = Signal::derive(move || state.get().delisting == Some(mint));
                            let disabled = Signal::derive(move || state.get().delisting.is_some());
                            view! {
                                <ListingCard
                                    listing=listing
                                    action=CardAction::Delist
                                    busy=busy
                                    disabled=disabled
                                    on_action=on_delist
                                />
                            }
                        })
                        .collect::<Vec<_>>()}
                </div>
            }
            .into_any()
        }}
    }
}

#[cfg(feature = "hydrate")]
async fn refresh(config: &MarketConfig, state: RwSignal<MyNftsState>, owner: Pubkey, after_write: bool) {
    state.update(|s| s.loading = true);
    let listed = async {
        if after_write {
            crate::net::market::reload_listings(config, Some(owner)).await
        } else {
            crate::net::market::load_listings(config, Some(owner)).await
        }
    };
    let (owned, listed) = futures::join!(crate::net::market::load_owned(config, owner), listed);
    match (owned, listed) {
        (Ok(owned), Ok(listed)) => state.update(|s| s.apply_fetch(owned, listed)),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("my NFTs fetch failed: {e}");
            let text = market::error::user_message(&e, "Failed to load your NFTs");
            state.update(|s| {
                s.loading = false;
                s.error = Some(text);
            });
        }
    }
}

/// Refetch both tabs after a confirmed write.
fn reload(config: &MarketConfig, state: RwSignal<MyNftsState>, wallet: RwSignal<WalletState>) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(owner) = wallet.get_untracked().pubkey {
            let config = config.clone();
            leptos::task::spawn_local(async move { refresh(&config, state, owner, true).await });
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, state, wallet);
    }
}

fn delist(config: &MarketConfig, state: RwSignal<MyNftsState>, wallet: RwSignal<WalletState>, listing: ListingView) {
    if state.get_untracked().delisting.is_some() {
        return;
    }
    state.update(|s| {
        s.delisting = Some(listing.mint);
        s.notice = None;
    });
    #[cfg(feature = "hydrate")]
    {
        let config = config.clone();
        let key = wallet.get_untracked().pubkey;
        leptos::task::spawn_local(async move {
            let submitted = crate::net::market::delist(&config, key, listing.mint).await;
            let notice = match crate::net::market::settle(&config, submitted).await {
                Ok(signature) => {
                    log::info!("delist submitted: {signature}");
                    Notice::success("NFT delisted successfully!")
                }
                Err(e) => {
                    log::error!("delist failed: {e}");
                    Notice::from_error(&e, "Failed to delist NFT")
                }
            };
            state.update(|s| {
                s.delisting = None;
                s.notice = Some(notice);
            });
            reload(&config, state, wallet);
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, wallet);
        state.update(|s| s.delisting = None);
    }
}
