//! Top navigation bar with route links and the wallet button.

use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::wallet::WalletState;

#[component]
pub fn Navbar() -> impl IntoView {
    let wallet = expect_context::<RwSignal<WalletState>>();

    // Reconnect silently if the extension already trusts this site.
    #[cfg(feature = "hydrate")]
    {
        leptos::task::spawn_local(async move {
            if !crate::net::wallet::is_available() {
                return;
            }
            if let Ok(key) = crate::net::wallet::connect(true).await {
                wallet.update(|w| w.connected(key));
            }
        });
    }

    let on_wallet_click = move |_| {
        if wallet.get_untracked().connecting {
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            if wallet.get_untracked().is_connected() {
                leptos::task::spawn_local(async move {
                    crate::net::wallet::disconnect().await;
                    wallet.update(WalletState::disconnected);
                });
                return;
            }
            wallet.update(WalletState::begin_connect);
            leptos::task::spawn_local(async move {
                match crate::net::wallet::connect(false).await {
                    Ok(key) => wallet.update(|w| w.connected(key)),
                    Err(e) => {
                        log::warn!("wallet connect failed: {e}");
                        wallet.update(|w| w.connect_failed(e));
                    }
                }
            });
        }
    };

    view! {
        <nav class="navbar">
            <A href="/" attr:class="navbar__brand">
                "NFT Marketplace"
            </A>
            <div class="navbar__links">
                <A href="/" attr:class="navbar__link">
                    "Marketplace"
                </A>
                <A href="/my-nfts" attr:class="navbar__link">
                    "My NFTs"
                </A>
                <A href="/admin" attr:class="navbar__link">
                    "Admin"
                </A>
            </div>
            <span class="navbar__spacer"></span>
            <Show when=move || wallet.get().error.is_some()>
                <span class="navbar__wallet-error">{move || wallet.get().error.unwrap_or_default()}</span>
            </Show>
            <button
                class="btn navbar__wallet"
                class:btn--primary=move || !wallet.get().is_connected()
                disabled=move || wallet.get().connecting
                title=move || wallet.get().pubkey.map(|k| k.to_string()).unwrap_or_default()
                on:click=on_wallet_click
            >
                {move || wallet.get().button_label()}
            </button>
        </nav>
    }
}
