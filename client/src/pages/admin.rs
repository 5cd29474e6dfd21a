//! Admin page: initialize the marketplace and update its fee.
//!
//! Both forms validate locally first; the on-chain program checks the
//! signer against the stored admin, so a non-admin wallet gets the program's
//! rejection message.

use leptos::prelude::*;
use market::accounts::MarketplaceAccount;
use market::config::MarketConfig;
use market::format::{format_fee_bps, shorten_address};
use market::validation::{parse_fee_bps, validate_name};

use crate::components::notice_banner::NoticeBanner;
use crate::components::wallet_gate::WalletGate;
use crate::state::notice::Notice;
use crate::state::wallet::WalletState;

#[component]
pub fn AdminPage() -> impl IntoView {
    let wallet = expect_context::<RwSignal<WalletState>>();
    let config = expect_context::<MarketConfig>();
    let program_id = config.program_id.to_string();

    let current = RwSignal::new(None::<MarketplaceAccount>);
    let name = RwSignal::new(String::new());
    let fee = RwSignal::new(String::new());
    let new_fee = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let notice = RwSignal::new(None::<Notice>);

    #[cfg(feature = "hydrate")]
    {
        let effect_config = config.clone();
        Effect::new(move || {
            if !wallet.get().is_connected() {
                return;
            }
            let config = effect_config.clone();
            leptos::task::spawn_local(async move { load_current(&config, current).await });
        });
    }

    let stored_config = StoredValue::new(config);
    let on_initialize = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let name_value = name.get_untracked().trim().to_owned();
        let fee_value = match validate_name(&name_value).and_then(|_| parse_fee_bps(&fee.get_untracked())) {
            Ok(v) => v,
            Err(e) => {
                notice.set(Some(Notice::error(e.to_string())));
                return;
            }
        };
        busy.set(true);
        notice.set(None);
        #[cfg(feature = "hydrate")]
        {
            let config = stored_config.get_value();
            let key = wallet.get_untracked().pubkey;
            leptos::task::spawn_local(async move {
                let submitted = crate::net::market::initialize(&config, key, &name_value, fee_value).await;
                let result = crate::net::market::settle(&config, submitted).await;
                finish(result, notice, busy, "Marketplace initialized successfully!", "Failed to initialize marketplace");
                load_current(&config, current).await;
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (stored_config, fee_value);
            busy.set(false);
        }
    };

    let on_update_fee = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let fee_value = match parse_fee_bps(&new_fee.get_untracked()) {
            Ok(v) => v,
            Err(e) => {
                notice.set(Some(Notice::error(e.to_string())));
                return;
            }
        };
        busy.set(true);
        notice.set(None);
        #[cfg(feature = "hydrate")]
        {
            let config = stored_config.get_value();
            let key = wallet.get_untracked().pubkey;
            leptos::task::spawn_local(async move {
                let submitted = crate::net::market::update_fee(&config, key, fee_value).await;
                let result = crate::net::market::settle(&config, submitted).await;
                finish(result, notice, busy, "Marketplace fee updated successfully!", "Failed to update marketplace fee");
                load_current(&config, current).await;
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (stored_config, fee_value);
            busy.set(false);
        }
    };

    let fee_preview = move |text: String| {
        parse_fee_bps(&text).map(|bps| format!("= {}", format_fee_bps(bps))).unwrap_or_default()
    };

    view! {
        <WalletGate
            title="Admin Access Required"
            message="Please connect your admin wallet to access the marketplace administration panel"
        >
            <div class="admin-page">
                <header class="page-header">
                    <h1>"Admin Panel"</h1>
                </header>
                <NoticeBanner notice=notice on_dismiss=Callback::new(move |()| notice.set(None)) />
                <dl class="admin-page__info">
                    <dt>"Program"</dt>
                    <dd title=program_id.clone()>{shorten_address(&program_id, 6)}</dd>
                    <dt>"Connected wallet"</dt>
                    <dd>{move || wallet.get().pubkey.map(|k| k.to_string()).unwrap_or_default()}</dd>
                    {move || {
                        current
                            .get()
                            .map(|m| {
                                view! {
                                    <dt>"Marketplace"</dt>
                                    <dd>{m.name.clone()}</dd>
                                    <dt>"Fee"</dt>
                                    <dd>{format_fee_bps(m.fee_bps)}</dd>
                                    <dt>"Admin"</dt>
                                    <dd>{m.authority.to_string()}</dd>
                                    <dt>"Treasury"</dt>
                                    <dd>{m.treasury.to_string()}</dd>
                                }
                            })
                    }}
                </dl>
                <form class="admin-page__form" on:submit=on_initialize>
                    <h2>"Initialize Marketplace"</h2>
                    <label class="admin-page__label">
                        "Marketplace Name"
                        <input
                            type="text"
                            maxlength="32"
                            placeholder="My NFT Marketplace"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="admin-page__label">
                        "Fee (basis points)"
                        <input
                            type="text"
                            inputmode="numeric"
                            placeholder="250 (2.5%)"
                            prop:value=move || fee.get()
                            on:input=move |ev| fee.set(event_target_value(&ev))
                        />
                        <span class="admin-page__hint">{move || fee_preview(fee.get())}</span>
                    </label>
                    <button
                        type="submit"
                        class="btn btn--primary"
                        disabled=move || busy.get() || name.get().trim().is_empty() || fee.get().trim().is_empty()
                    >
                        {move || if busy.get() { "Processing..." } else { "Initialize Marketplace" }}
                    </button>
                </form>
                <form class="admin-page__form" on:submit=on_update_fee>
                    <h2>"Update Fee"</h2>
                    <label class="admin-page__label">
                        "New Fee (basis points)"
                        <input
                            type="text"
                            inputmode="numeric"
                            placeholder="500 (5%)"
                            prop:value=move || new_fee.get()
                            on:input=move |ev| new_fee.set(event_target_value(&ev))
                        />
                        <span class="admin-page__hint">{move || fee_preview(new_fee.get())}</span>
                    </label>
                    <button
                        type="submit"
                        class="btn btn--primary"
                        disabled=move || busy.get() || new_fee.get().trim().is_empty()
                    >
                        {move || if busy.get() { "Processing..." } else { "Update Fee" }}
                    </button>
                </form>
            </div>
        </WalletGate>
    }
}

#[cfg(feature = "hydrate")]
async fn load_current(config: &MarketConfig, current: RwSignal<Option<MarketplaceAccount>>) {
    match crate::net::market::load_marketplace(config).await {
        Ok(account) => current.set(account),
        Err(e) => log::warn!("marketplace fetch failed: {e}"),
    }
}

#[cfg(feature = "hydrate")]
fn finish(
    result: Result<String, market::MarketError>,
    notice: RwSignal<Option<Notice>>,
    busy: RwSignal<bool>,
    success: &str,
    fallback: &str,
) {
    let next = match result {
        Ok(signature) => {
            log::info!("transaction submitted: {signature}");
            Notice::success(success)
        }
        Err(e) => {
            log::error!("{fallback}: {e}");
            Notice::from_error(&e, fallback)
        }
    };
    notice.set(Some(next));
    busy.set(false);
}
