//! Cards for listed and owned NFTs.
//!
//! DESIGN
//! ======
//! Cards never act on their own. The browse page turns "Buy Now" into a
//! confirmation modal and the my-NFTs page turns "Delist" into a submission;
//! the card only reports which listing was chosen and shows the busy state
//! it is given.

#[cfg(test)]
#[path = "nft_card_test.rs"]
mod nft_card_test;

use leptos::prelude::*;
use market::Pubkey;
use market::format::{format_sol, shorten_address};
use market::gateway::Attribute;
use market::listings::{ListingView, OwnedNft};

/// Attribute chips shown on a card before collapsing into "+N more".
pub(crate) const MAX_CHIPS: usize = 3;

/// Chip labels plus the overflow label, if any.
pub(crate) fn attribute_chips(attributes: &[Attribute]) -> (Vec<String>, Option<String>) {
    let chips = attributes
        .iter()
        .take(MAX_CHIPS)
        .map(|a| format!("{}: {}", a.trait_type, a.value))
        .collect();
    let overflow = (attributes.len() > MAX_CHIPS).then(|| format!("+{} more", attributes.len() - MAX_CHIPS));
    (chips, overflow)
}

/// Two-letter badge from a base58 address.
pub(crate) fn seller_initials(address: &str) -> String {
    address.chars().take(2).collect::<String>().to_uppercase()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardAction {
    Buy,
    Delist,
}

impl CardAction {
    fn idle_label(self) -> &'static str {
        match self {
            Self::Buy => "Buy Now",
            Self::Delist => "Delist NFT",
        }
    }

    fn busy_label(self) -> &'static str {
        match self {
            Self::Buy => "Purchasing...",
            Self::Delist => "Delisting...",
        }
    }
}

#[component]
fn CardImage(image: Option<String>, name: String) -> impl IntoView {
    match image {
        Some(src) => view! { <img class="nft-card__image" src=src alt=name /> }.into_any(),
        None => view! { <div class="nft-card__image nft-card__image--empty" aria-hidden="true"></div> }.into_any(),
    }
}

#[component]
fn AttributeChips(attributes: Vec<Attribute>) -> impl IntoView {
    let (chips, overflow) = attribute_chips(&attributes);
    view! {
        <div class="nft-card__chips">
            {chips.into_iter().map(|c| view! { <span class="chip">{c}</span> }).collect::<Vec<_>>()}
            {overflow.map(|o| view! { <span class="chip chip--muted">{o}</span> })}
        </div>
    }
}

/// A listed NFT with its price, seller, and a buy or delist button.
#[component]
pub fn ListingCard(
    listing: ListingView,
    action: CardAction,
    /// This card's action is in flight.
    #[prop(into)]
    busy: Signal<bool>,
    /// Some other action is in flight or the wallet is disconnected.
    #[prop(into)]
    disabled: Signal<bool>,
    on_action: Callback<ListingView>,
) -> impl IntoView {
    let seller = listing.seller.to_string();
    let price = format!("{} SOL", format_sol(listing.price));
    let chosen = listing.clone();

    view! {
        <div class="nft-card">
            <div class="nft-card__media">
                <CardImage image=listing.image.clone() name=listing.name.clone() />
                <span class="nft-card__price">{price}</span>
            </div>
            <div class="nft-card__body">
                <h3 class="nft-card__name">{listing.name.clone()}</h3>
                {listing.description.clone().map(|d| view! { <p class="nft-card__description">{d}</p> })}
                <div class="nft-card__seller">
                    <span class="nft-card__avatar">{seller_initials(&seller)}</span>
                    <span class="nft-card__seller-label">"Owner"</span>
                    <span class="nft-card__seller-key" title=seller.clone()>{shorten_address(&seller, 4)}</span>
                </div>
                <AttributeChips attributes=listing.attributes.clone() />
                <button
                    class="btn nft-card__action"
                    class:btn--primary={action == CardAction::Buy}
                    class:btn--danger={action == CardAction::Delist}
                    disabled=move || busy.get() || disabled.get()
                    on:click=move |_| on_action.run(chosen.clone())
                >
                    {move || if busy.get() { action.busy_label() } else { action.idle_label() }}
                </button>
            </div>
        </div>
    }
}

/// An NFT held in the connected wallet, with a shortcut into the listing form.
#[component]
pub fn OwnedNftCard(nft: OwnedNft, on_list: Callback<Pubkey>) -> impl IntoView {
    let mint = nft.mint;
    let mint_text = mint.to_string();

    view! {
        <div class="nft-card">
            <div class="nft-card__media">
                <CardImage image=nft.image.clone() name=nft.name.clone() />
            </div>
            <div class="nft-card__body">
                <h3 class="nft-card__name">{nft.name.clone()}</h3>
                {(!nft.symbol.is_empty()).then(|| view! { <span class="nft-card__symbol">{nft.symbol.clone()}</span> })}
                {nft.description.clone().map(|d| view! { <p class="nft-card__description">{d}</p> })}
                <span class="nft-card__mint" title=mint_text.clone()>{shorten_address(&mint_text, 4)}</span>
                <AttributeChips attributes=nft.attributes.clone() />
                <button class="btn btn--primary nft-card__action" on:click=move |_| on_list.run(mint)>
                    "List for Sale"
                </button>
            </div>
        </div>
    }
}
