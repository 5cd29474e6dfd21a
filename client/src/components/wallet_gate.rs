//! Connect prompt shown in place of a page until a wallet is connected.

use leptos::prelude::*;

use crate::state::wallet::WalletState;

#[component]
pub fn WalletGate(title: &'static str, message: &'static str, children: ChildrenFn) -> impl IntoView {
    let wallet = expect_context::<RwSignal<WalletState>>();

    view! {
        <Show
            when=move || wallet.get().is_connected()
            fallback=move || {
                view! {
                    <div class="wallet-gate">
                        <h2 class="wallet-gate__title">{title}</h2>
                        <p class="wallet-gate__message">{message}</p>
                    </div>
                }
            }
        >
            {children()}
        </Show>
    }
}
