//! Dismissible success/error banner.

use leptos::prelude::*;

use crate::state::notice::Notice;

#[component]
pub fn NoticeBanner(#[prop(into)] notice: Signal<Option<Notice>>, on_dismiss: Callback<()>) -> impl IntoView {
    view! {
        {move || {
            notice
                .get()
                .map(|n| {
                    let class = n.css_class();
                    view! {
                        <div class=class role="alert">
                            <span class="notice__text">{n.text}</span>
                            <button class="notice__dismiss" aria-label="Dismiss" on:click=move |_| on_dismiss.run(())>
                                "✕"
                            </button>
                        </div>
                    }
                })
        }}
    }
}
