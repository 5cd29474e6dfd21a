//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::navbar::Navbar;
use crate::pages::{admin::AdminPage, marketplace::MarketplacePage, my_nfts::MyNftsPage};
use crate::state::{market::MarketState, my_nfts::MyNftsState, wallet::WalletState};

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the endpoint configuration and all shared state contexts, then
/// sets up client-side routing. A bundle built without a valid program id
/// renders a configuration error instead of the pages.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = match crate::config::load() {
        Ok(config) => config,
        Err(e) => {
            return view! {
                <Title text="NFT Marketplace"/>
                <div class="config-error">
                    <h1>"Configuration error"</h1>
                    <p>{e.to_string()}</p>
                </div>
            }
            .into_any();
        }
    };

    provide_context(config);
    provide_context(RwSignal::new(WalletState::default()));
    provide_context(RwSignal::new(MarketState::default()));
    provide_context(RwSignal::new(MyNftsState::default()));

    view! {
        <Stylesheet id="leptos" href="/pkg/nft-market.css"/>
        <Title text="NFT Marketplace"/>

        <Router>
            <Navbar/>
            <main class="app-main">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("") view=MarketplacePage/>
                    <Route path=StaticSegment("my-nfts") view=MyNftsPage/>
                    <Route path=StaticSegment("admin") view=AdminPage/>
                </Routes>
            </main>
        </Router>
    }
    .into_any()
}
