//! # client
//!
//! Leptos + WASM frontend for the NFT marketplace. Server-rendered by the
//! `server` crate and hydrated in the browser, where it talks directly to the
//! cluster RPC endpoint and signs through the user's wallet extension.
//!
//! Domain logic (address derivation, instruction encoding, validation,
//! filtering) lives in the `market` crate; this crate owns pages, components,
//! reactive state, and the browser implementations of the network seams.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;

/// WASM entry point: install logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
