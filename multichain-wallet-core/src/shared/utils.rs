//! Utility functions for the wallet core
//!
//! This module contains common utility functions used throughout the wallet core.

use ethers::types::U256;

use crate::shared::constants::{ADDRESS_LENGTH, MAX_DECIMALS};
use crate::shared::error::WalletError;

/// Generate a unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Validate Ethereum address format
pub fn validate_ethereum_address(address: &str) -> Result<(), WalletError> {
    if !address.starts_with("0x") {
        return Err(WalletError::validation("Address must start with 0x"));
    }

    if address.len() != ADDRESS_LENGTH {
        return Err(WalletError::validation("Address must be 42 characters long"));
    }

    // Check if all characters after 0x are valid hex
    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::validation("Address contains invalid hex characters"));
    }

    Ok(())
}

/// Parse a JSON-RPC hex quantity (`0x1bc16d674ec80000`) into a U256
pub fn parse_hex_quantity(quantity: &str) -> Result<U256, WalletError> {
    let digits = quantity
        .strip_prefix("0x")
        .or_else(|| quantity.strip_prefix("0X"))
        .ok_or_else(|| WalletError::decode(format!("Quantity is not 0x-prefixed: {}", quantity)))?;
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| WalletError::decode(format!("Invalid hex quantity {}: {:?}", quantity, e)))
}

/// Parse a hex chain id (`0x89`) into its numeric value
pub fn parse_chain_id(chain_id: &str) -> Result<u64, WalletError> {
    let digits = chain_id
        .strip_prefix("0x")
        .or_else(|| chain_id.strip_prefix("0X"))
        .ok_or_else(|| WalletError::validation(format!("Chain id is not 0x-prefixed: {}", chain_id)))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| WalletError::validation(format!("Invalid chain id {}: {}", chain_id, e)))
}

/// Wallets report chain ids with varying case and zero padding, so compare numerically
pub fn chain_ids_match(left: &str, right: &str) -> bool {
    match (parse_chain_id(left), parse_chain_id(right)) {
        (Ok(l), Ok(r)) => l == r,
        _ => left.eq_ignore_ascii_case(right),
    }
}

/// Scale a raw integer amount by `decimals` into a canonical decimal string.
///
/// The fractional part keeps full precision with trailing zeros trimmed, but
/// always carries at least one digit: `10^18` with 18 decimals is `"1.0"`,
/// `500000` with 6 decimals is `"0.5"`.
pub fn format_units(amount: U256, decimals: u32) -> Result<String, WalletError> {
    if decimals > MAX_DECIMALS {
        return Err(WalletError::validation(format!(
            "Decimals {} exceeds the maximum of {}",
            decimals, MAX_DECIMALS
        )));
    }

    let base = U256::exp10(decimals as usize);
    let (integer, fraction) = amount.div_mod(base);

    let mut fraction_digits = if decimals == 0 {
        String::new()
    } else {
        format!("{:0>width$}", fraction.to_string(), width = decimals as usize)
    };
    while fraction_digits.ends_with('0') {
        fraction_digits.pop();
    }
    if fraction_digits.is_empty() {
        fraction_digits.push('0');
    }

    Ok(format!("{}.{}", integer, fraction_digits))
}

/// Environment key for overriding the RPC endpoint of a network,
/// e.g. `BNB Smart Chain` becomes `BNB_SMART_CHAIN`
pub fn env_key_for(display_name: &str) -> String {
    let mut key = String::with_capacity(display_name.len());
    for c in display_name.chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_uppercase());
        } else if !key.ends_with('_') {
            key.push('_');
        }
    }
    key.trim_matches('_').to_string()
}
