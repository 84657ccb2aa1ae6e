//! Fixed-point formatting of token base units.

use crate::error::{Error, Result};
use alloy::primitives::utils;
use alloy::primitives::U256;

/// Format `value` base units as a decimal string with `decimals` fractional
/// digits. Trailing fractional zeros are dropped, and so is the point when
/// nothing remains after it: `1_500_000` with 6 decimals is `"1.5"`,
/// `10^24` with 18 decimals is `"1000000"`.
///
/// # Errors
///
/// Returns [`Error::Decode`] if `decimals` exceeds what an EVM unit can
/// express (77).
pub fn format_units(value: U256, decimals: u8) -> Result<String> {
    let padded = utils::format_units(value, decimals)
        .map_err(|e| Error::Decode(format!("cannot format with {decimals} decimals: {e}")))?;
    Ok(trim_fraction(&padded).to_string())
}

fn trim_fraction(formatted: &str) -> &str {
    if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted
    }
}

/// Floating approximation of a string produced by [`format_units`].
///
/// Precision is lost once the balance exceeds what an `f64` mantissa holds.
#[must_use]
pub fn approximate(formatted: &str) -> f64 {
    formatted.parse().unwrap_or_default()
}
