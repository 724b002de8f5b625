//! Decimal unit strings <-> base-unit integers (wei, token base units).

use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::U256;

use crate::error::EthError;

/// Decimals of the native ether unit.
pub const ETHER_DECIMALS: u8 = 18;

/// Parses a decimal amount such as `"0.001"` into base units.
pub fn to_base_units(amount: &str, decimals: u8) -> Result<U256, EthError> {
    let parsed = parse_units(amount, decimals)
        .map_err(|e| EthError::InvalidAmount(format!("{amount}: {e}")))?;
    Ok(parsed.get_absolute())
}

/// Parses an ether amount into wei.
pub fn parse_ether(amount: &str) -> Result<U256, EthError> {
    to_base_units(amount, ETHER_DECIMALS)
}

/// Formats base units as a decimal string with exactly `decimals` fraction digits.
pub fn from_base_units(value: U256, decimals: u8) -> Result<String, EthError> {
    format_units(value, decimals).map_err(|e| EthError::InvalidAmount(e.to_string()))
}

/// Encodes a quantity the way JSON-RPC expects it: `0x`-prefixed, no leading zeros.
pub fn to_hex_quantity(value: U256) -> String {
    format!("0x{value:x}")
}
