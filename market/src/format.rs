//! Display helpers shared by the UI and the CLI.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use crate::validation::LAMPORTS_PER_SOL;

const LAMPORTS_PER_CENT_SOL: u64 = LAMPORTS_PER_SOL / 100;

/// `"AbCd...WxYz"` with `chars` characters kept on each side.
#[must_use]
pub fn shorten_address(address: &str, chars: usize) -> String {
    let count = address.chars().count();
    if count <= chars * 2 {
        return address.to_owned();
    }
    let head: String = address.chars().take(chars).collect();
    let tail: String = address.chars().skip(count - chars).collect();
    format!("{head}...{tail}")
}

/// Lamports as SOL with two decimals, rounded half up.
#[must_use]
pub fn format_sol(lamports: u64) -> String {
    let cents = lamports / LAMPORTS_PER_CENT_SOL + u64::from(lamports % LAMPORTS_PER_CENT_SOL >= LAMPORTS_PER_CENT_SOL / 2);
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Basis points as a percentage string, e.g. `250` -> `"2.5%"`.
#[must_use]
pub fn format_fee_bps(bps: u16) -> String {
    let whole = bps / 100;
    let frac = bps % 100;
    if frac == 0 {
        format!("{whole}%")
    } else if frac % 10 == 0 {
        format!("{whole}.{}%", frac / 10)
    } else {
        format!("{whole}.{frac:02}%")
    }
}
