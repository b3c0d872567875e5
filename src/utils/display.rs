//! Display Helpers
//!
//! Address shortening for UI surfaces and decimal conversion between
//! human-readable token amounts and base units.

use ethers_core::types::U256;

use crate::error::{FluidError, FluidResult};

/// Shorten an address for display: first 6 and last 4 characters.
///
/// Short inputs pass through unchanged.
pub fn shorten_address(address: &str) -> String {
    let trimmed = address.trim();
    if trimmed.len() <= 10 {
        return trimmed.to_string();
    }
    format!("{}...{}", &trimmed[..6], &trimmed[trimmed.len() - 4..])
}

/// Parse a decimal token amount into base units (18 decimals)
///
/// "1.5" becomes 1_500_000_000_000_000_000. More than 18 fractional
/// digits is rejected rather than silently truncated.
pub fn parse_units(amount: &str, decimals: u32) -> FluidResult<U256> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(FluidError::parse_error("Empty amount"));
    }

    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if frac.len() as u32 > decimals {
        return Err(FluidError::parse_error(format!(
            "Amount has more than {} decimal places",
            decimals
        )));
    }

    let whole_part = if whole.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(whole)
            .map_err(|e| FluidError::parse_error(format!("Invalid amount: {}", e)))?
    };

    let scale = U256::from(10u64).pow(U256::from(decimals));
    let mut result = whole_part
        .checked_mul(scale)
        .ok_or_else(|| FluidError::parse_error("Amount overflows 256 bits"))?;

    if !frac.is_empty() {
        let frac_value = U256::from_dec_str(frac)
            .map_err(|e| FluidError::parse_error(format!("Invalid amount: {}", e)))?;
        let frac_scale = U256::from(10u64).pow(U256::from(decimals - frac.len() as u32));
        result = result
            .checked_add(frac_value * frac_scale)
            .ok_or_else(|| FluidError::parse_error("Amount overflows 256 bits"))?;
    }

    Ok(result)
}

/// Format base units as a decimal string, trimming trailing zeros
pub fn format_units(amount: U256, decimals: u32) -> String {
    let scale = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / scale;
    let frac = amount % scale;

    if frac.is_zero() {
        return whole.to_string();
    }

    let frac_str = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    let trimmed = frac_str.trim_end_matches('0');
    format!("{}.{}", whole, trimmed)
}
