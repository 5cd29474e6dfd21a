//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (fetching, polling, in-flight
//! flags, notices) and delegates rendering details to `components`.

pub mod admin;
pub mod marketplace;
pub mod my_nfts;
