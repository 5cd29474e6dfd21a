//! Listing form: mint, price, and optional fresh metadata with an image.
//!
//! SYSTEM CONTEXT
//! ==============
//! Lives on the my-NFTs page. On submit the draft is validated first; an
//! invalid mint or price never reaches the pinning proxy or the RPC endpoint.
//! When an image is chosen the image and the completed metadata document are
//! pinned, then the listing transaction is sent.
//!
//! ERROR HANDLING
//! ==============
//! Validation and submission failures are shown inline and clear the
//! in-flight flag so the user can correct the form and retry.

#[cfg(test)]
#[path = "listing_form_test.rs"]
mod listing_form_test;

use leptos::prelude::*;
use market::MarketError;
use market::Pubkey;
use market::gateway::{Attribute, AttributeValue, NftMetadata};
use market::validation::{parse_mint, parse_price_sol, validate_name};

const UPLOADING: &str = "Uploading...";
const LISTING: &str = "Listing...";

/// One editable trait row. `id` stays fixed while the row exists so the
/// rendered inputs survive edits and removals of other rows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct AttributeRow {
    pub id: u32,
    pub trait_type: String,
    pub value: String,
}

/// Raw form text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ListingDraft {
    pub mint: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub attributes: Vec<AttributeRow>,
    next_row_id: u32,
}

impl ListingDraft {
    pub(crate) fn for_mint(mint: Option<Pubkey>) -> Self {
        Self { mint: mint.map(|m| m.to_string()).unwrap_or_default(), ..Self::default() }
    }

    pub(crate) fn add_attribute(&mut self) -> u32 {
        let id = self.next_row_id;
        self.next_row_id += 1;
        self.attributes.push(AttributeRow { id, ..AttributeRow::default() });
        id
    }

    pub(crate) fn remove_attribute(&mut self, id: u32) {
        self.attributes.retain(|row| row.id != id);
    }

    pub(crate) fn attribute_mut(&mut self, id: u32) -> Option<&mut AttributeRow> {
        self.attributes.iter_mut().find(|row| row.id == id)
    }

    pub(crate) fn attribute_ids(&self) -> Vec<u32> {
        self.attributes.iter().map(|row| row.id).collect()
    }

    /// Field checks that must pass before anything is uploaded or sent.
    /// The name is only required when fresh metadata will be pinned.
    pub(crate) fn check(&self, pinning: bool) -> Result<(), MarketError> {
        parse_mint(&self.mint)?;
        parse_price_sol(&self.price)?;
        if pinning {
            validate_name(&self.name)?;
        }
        Ok(())
    }

    /// Metadata document without its image; rows with a blank side are dropped.
    pub(crate) fn metadata(&self) -> NftMetadata {
        let attributes: Vec<Attribute> = self
            .attributes
            .iter()
            .filter(|row| !row.trait_type.trim().is_empty() && !row.value.trim().is_empty())
            .map(|row| Attribute {
                trait_type: row.trait_type.trim().to_owned(),
                value: AttributeValue::Text(row.value.trim().to_owned()),
            })
            .collect();
        let description = self.description.trim();
        NftMetadata {
            name: Some(self.name.trim().to_owned()),
            description: (!description.is_empty()).then(|| description.to_owned()),
            attributes: (!attributes.is_empty()).then_some(attributes),
            ..NftMetadata::default()
        }
    }
}

/// What a completed submission produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingOutcome {
    pub signature: String,
    /// Gateway URL of the pinned metadata document, when one was uploaded.
    pub metadata_url: Option<String>,
}

#[component]
pub fn ListingForm(
    prefill: Option<Pubkey>,
    on_success: Callback<ListingOutcome>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let draft = RwSignal::new(ListingDraft::for_mint(prefill));
    let image_name = RwSignal::new(None::<String>);
    let image_ref = NodeRef::<leptos::html::Input>::new();
    let stage = RwSignal::new(None::<&'static str>);
    let error = RwSignal::new(None::<String>);
    let config = StoredValue::new(expect_context::<market::config::MarketConfig>());
    let wallet = expect_context::<RwSignal<crate::state::wallet::WalletState>>();

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if stage.get_untracked().is_some() {
            return;
        }
        let current = draft.get_untracked();
        let pinning = image_name.get_untracked().is_some();
        if let Err(e) = current.check(pinning) {
            error.set(Some(market::error::user_message(&e, "Failed to list NFT")));
            return;
        }
        error.set(None);
        stage.set(Some(if pinning { UPLOADING } else { LISTING }));
        #[cfg(feature = "hydrate")]
        {
            let config = config.get_value();
            let key = wallet.get_untracked().pubkey;
            let image = image_ref.get_untracked().and_then(|input| input.files()).and_then(|files| files.get(0));
            leptos::task::spawn_local(async move {
                let result = submit_listing(&config, key, &current, image, stage).await;
                stage.set(None);
                match result {
                    Ok(outcome) => on_success.run(outcome),
                    Err(e) => {
                        log::error!("listing failed: {e}");
                        error.set(Some(market::error::user_message(&e, "Failed to list NFT")));
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (config, wallet, current);
            stage.set(None);
        }
    };

    let on_image_change = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let name = image_ref.get_untracked().and_then(|input| input.files()).and_then(|files| files.get(0)).map(|f| f.name());
            image_name.set(name);
        }
    };

    let add_attribute = move |_| {
        draft.update(|d| {
            d.add_attribute();
        });
    };
    let row_ids = Memo::new(move |_| draft.with(ListingDraft::attribute_ids));

    view! {
        <form class="listing-form" on:submit=submit>
            <h2>"List Your NFT"</h2>
            <p class="listing-form__subtitle">"Create a new listing for your digital asset"</p>
            <label class="listing-form__label">
                "NFT Mint Address"
                <input
                    class="listing-form__input"
                    type="text"
                    placeholder="Enter NFT mint address"
                    prop:value=move || draft.get().mint
                    on:input=move |ev| draft.update(|d| d.mint = event_target_value(&ev))
                />
            </label>
            <label class="listing-form__label">
                "Name"
                <input
                    class="listing-form__input"
                    type="text"
                    placeholder="NFT Name"
                    maxlength="32"
                    prop:value=move || draft.get().name
                    on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
                />
            </label>
            <label class="listing-form__label">
                "Price (SOL)"
                <input
                    class="listing-form__input"
                    type="text"
                    inputmode="decimal"
                    placeholder="0.00"
                    prop:value=move || draft.get().price
                    on:input=move |ev| draft.update(|d| d.price = event_target_value(&ev))
                />
            </label>
            <label class="listing-form__label">
                "Description"
                <textarea
                    class="listing-form__input"
                    rows="4"
                    placeholder="Describe your NFT"
                    prop:value=move || draft.get().description
                    on:input=move |ev| draft.update(|d| d.description = event_target_value(&ev))
                ></textarea>
            </label>
            <label class="listing-form__label">
                "Image"
                <input
                    class="listing-form__input"
                    type="file"
                    accept="image/*"
                    node_ref=image_ref
                    on:change=on_image_change
                />
            </label>
            <div class="listing-form__attributes">
                <div class="listing-form__attributes-header">
                    <span>"Attributes"</span>
                    <button type="button" class="btn" on:click=add_attribute>
                        "+ Add Attribute"
                    </button>
                </div>
                <For each=move || row_ids.get() key=|id| *id let:id>
                    <AttributeEditor draft=draft id=id />
                </For>
            </div>
            <Show when=move || error.get().is_some()>
                <p class="listing-form__error" role="alert">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <div class="dialog__actions">
                <button type="submit" class="btn btn--primary" disabled=move || stage.get().is_some()>
                    {move || stage.get().unwrap_or("List NFT")}
                </button>
                <button type="button" class="btn" on:click=move |_| on_cancel.run(())>
                    "Cancel"
                </button>
            </div>
        </form>
    }
}

#[component]
fn AttributeEditor(draft: RwSignal<ListingDraft>, id: u32) -> impl IntoView {
    let field = move |pick: fn(&AttributeRow) -> &String| {
        draft.with(|d| d.attributes.iter().find(|row| row.id == id).map(|row| pick(row).clone()).unwrap_or_default())
    };
    view! {
        <div class="listing-form__attribute">
            <input
                type="text"
                placeholder="Trait type"
                prop:value=move || field(|row| &row.trait_type)
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    draft.update(|d| {
                        if let Some(row) = d.attribute_mut(id) {
                            row.trait_type = text;
                        }
                    });
                }
            />
            <input
                type="text"
                placeholder="Value"
                prop:value=move || field(|row| &row.value)
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    draft.update(|d| {
                        if let Some(row) = d.attribute_mut(id) {
                            row.value = text;
                        }
                    });
                }
            />
            <button
                type="button"
                class="btn btn--danger"
                aria-label="Remove attribute"
                on:click=move |_| draft.update(|d| d.remove_attribute(id))
            >
                "✕"
            </button>
        </div>
    }
}

#[cfg(feature = "hydrate")]
async fn submit_listing(
    config: &market::config::MarketConfig,
    wallet: Option<Pubkey>,
    draft: &ListingDraft,
    image: Option<web_sys::File>,
    stage: RwSignal<Option<&'static str>>,
) -> Result<ListingOutcome, MarketError> {
    if wallet.is_none() {
        return Err(MarketError::WalletNotConnected);
    }
    let mut metadata_url = None;
    if let Some(file) = image {
        stage.set(Some(UPLOADING));
        let pinned = crate::net::gateway::upload_nft(&file, draft.metadata(), &config.gateway_url).await?;
        metadata_url = Some(market::gateway::ipfs_url(&config.gateway_url, &pinned.metadata_hash));
    }
    stage.set(Some(LISTING));
    let submitted = crate::net::market::list(config, wallet, &draft.mint, &draft.price).await;
    let signature = crate::net::market::settle(config, submitted).await?;
    Ok(ListingOutcome { signature, metadata_url })
}
