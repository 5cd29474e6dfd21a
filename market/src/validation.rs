//! Form validation shared by every front end.
//!
//! These checks run before any network call so an invalid form never reaches
//! the RPC endpoint. The on-chain program enforces the same bounds again.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use std::str::FromStr;

use solana_program::pubkey::Pubkey;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const MAX_NAME_LEN: usize = 32;
pub const MAX_FEE_BPS: u16 = 10_000;
const SOL_DECIMALS: usize = 9;

/// A rejected form value. The `Display` text is shown to the user verbatim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Enter a price.")]
    PriceMissing,
    #[error("Price must be a number.")]
    PriceNotNumber,
    #[error("Price supports at most 9 decimal places.")]
    PriceTooPrecise,
    #[error("Price must be greater than zero.")]
    PriceNotPositive,
    #[error("Price is too large.")]
    PriceTooLarge,
    #[error("Name must not be empty.")]
    NameEmpty,
    #[error("Name must be at most 32 characters.")]
    NameTooLong,
    #[error("Fee must be a whole number of basis points.")]
    FeeNotNumber,
    #[error("Fee must be between 0 and 10000 basis points.")]
    FeeOutOfRange,
    #[error("Enter a valid mint address.")]
    InvalidMint,
}

/// Parse a SOL amount typed by the user into lamports.
///
/// # Errors
///
/// Rejects empty input, anything that is not a plain non-negative decimal,
/// more than 9 fractional digits, zero, and amounts that overflow `u64`.
pub fn parse_price_sol(input: &str) -> Result<u64, ValidationError> {
    let raw = input.trim();
    if raw.is_empty() {
        return Err(ValidationError::PriceMissing);
    }
    if raw.starts_with('-') {
        return Err(ValidationError::PriceNotPositive);
    }
    let (whole, frac) = raw.split_once('.').unwrap_or((raw, ""));
    if whole.is_empty() && frac.is_empty() {
        return Err(ValidationError::PriceNotNumber);
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PriceNotNumber);
    }
    if frac.len() > SOL_DECIMALS {
        return Err(ValidationError::PriceTooPrecise);
    }

    let whole_lamports = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u64>()
            .map_err(|_| ValidationError::PriceTooLarge)?
            .checked_mul(LAMPORTS_PER_SOL)
            .ok_or(ValidationError::PriceTooLarge)?
    };
    let frac_lamports = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<9}")
            .parse::<u64>()
            .map_err(|_| ValidationError::PriceNotNumber)?
    };
    let lamports = whole_lamports
        .checked_add(frac_lamports)
        .ok_or(ValidationError::PriceTooLarge)?;
    if lamports == 0 {
        return Err(ValidationError::PriceNotPositive);
    }
    Ok(lamports)
}

/// Validate a lamport price that did not come from text input.
///
/// # Errors
///
/// Returns [`ValidationError::PriceNotPositive`] for zero.
pub fn validate_price(lamports: u64) -> Result<u64, ValidationError> {
    if lamports == 0 {
        return Err(ValidationError::PriceNotPositive);
    }
    Ok(lamports)
}

/// Validate a marketplace name: non-blank and at most 32 characters.
///
/// # Errors
///
/// Returns [`ValidationError::NameEmpty`] or [`ValidationError::NameTooLong`].
pub fn validate_name(name: &str) -> Result<&str, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::NameEmpty);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }
    Ok(name)
}

/// Validate a fee in basis points.
///
/// # Errors
///
/// Returns [`ValidationError::FeeOutOfRange`] above 10000.
pub fn validate_fee(fee_bps: u16) -> Result<u16, ValidationError> {
    if fee_bps > MAX_FEE_BPS {
        return Err(ValidationError::FeeOutOfRange);
    }
    Ok(fee_bps)
}

/// Parse a fee typed by the user.
///
/// # Errors
///
/// Rejects non-integers, negatives, and values above 10000.
pub fn parse_fee_bps(input: &str) -> Result<u16, ValidationError> {
    let raw = input.trim();
    if raw.starts_with('-') {
        return Err(ValidationError::FeeOutOfRange);
    }
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::FeeNotNumber);
    }
    let value = raw.parse::<u32>().map_err(|_| ValidationError::FeeOutOfRange)?;
    let fee = u16::try_from(value).map_err(|_| ValidationError::FeeOutOfRange)?;
    validate_fee(fee)
}

/// Parse a base58 mint address.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidMint`] if the text is not a 32-byte base58 key.
pub fn parse_mint(input: &str) -> Result<Pubkey, ValidationError> {
    Pubkey::from_str(input.trim()).map_err(|_| ValidationError::InvalidMint)
}
