//! Purchase confirmation dialog.

use leptos::prelude::*;
use market::format::format_sol;
use market::listings::ListingView;

#[component]
pub fn PurchaseModal(
    listing: ListingView,
    #[prop(into)] busy: Signal<bool>,
    on_confirm: Callback<ListingView>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let price = format!("{} SOL", format_sol(listing.price));
    let chosen = listing.clone();
    let on_keydown = move |ev: leptos::ev::KeyboardEvent| {
        if ev.key() == "Escape" && !busy.get_untracked() {
            ev.prevent_default();
            on_cancel.run(());
        }
    };

    view! {
        <div
            class="dialog-backdrop"
            on:click=move |_| {
                if !busy.get_untracked() {
                    on_cancel.run(());
                }
            }
            on:keydown=on_keydown
        >
            <div class="dialog purchase-modal" on:click=move |ev| ev.stop_propagation()>
                <h2>"Confirm Purchase"</h2>
                <p class="dialog__subtitle">"You're about to purchase this NFT"</p>
                <div class="purchase-modal__item">
                    {listing.image.clone().map(|src| view! { <img class="purchase-modal__image" src=src alt=listing.name.clone() /> })}
                    <div>
                        <div class="purchase-modal__name">{listing.name.clone()}</div>
                        {listing.description.clone().map(|d| view! { <div class="purchase-modal__description">{d}</div> })}
                    </div>
                </div>
                <div class="purchase-modal__total">
                    <span>"Total Price"</span>
                    <span class="purchase-modal__price">{price}</span>
                </div>
                <div class="dialog__actions">
                    <button class="btn" disabled=move || busy.get() on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button
                        class="btn btn--primary"
                        disabled=move || busy.get()
                        on:click=move |_| on_confirm.run(chosen.clone())
                    >
                        {move || if busy.get() { "Processing..." } else { "Confirm Purchase" }}
                    </button>
                </div>
            </div>
        </div>
    }
}
