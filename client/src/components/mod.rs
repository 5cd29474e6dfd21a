//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render marketplace chrome and cards. They read shared state
//! from Leptos context providers and report user intent through callbacks;
//! network actions stay in the pages.

pub mod listing_form;
pub mod marketplace_stats;
pub mod navbar;
pub mod nft_card;
pub mod notice_banner;
pub mod purchase_modal;
pub mod wallet_gate;
