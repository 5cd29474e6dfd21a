//! Reactive application state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each struct is wrapped in an `RwSignal` and provided as context by
//! `app::App`. Pages read and update them; the `market` crate never sees
//! these types.

pub mod market;
pub mod my_nfts;
pub mod notice;
pub mod wallet;

/// Wall-clock time in unix milliseconds.
#[must_use]
pub fn now_ms() -> u64 {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let now = js_sys::Date::now() as u64;
        now
    }
    #[cfg(not(feature = "hydrate"))]
    {
        0
    }
}
