//! Token holding entity for the wallet core

use serde::{Deserialize, Serialize};

use crate::shared::types::Quantity;

/// A non-zero balance of one asset on one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHolding {
    pub symbol: String,
    /// Display name of the network the balance was read on
    pub chain: String,
    /// Decimal string, already scaled by the asset's decimals
    pub quantity: Quantity,
    /// UI-only annotation; the core never sets it
    #[serde(default)]
    pub selected: bool,
}

impl TokenHolding {
    pub fn new(symbol: impl Into<String>, chain: impl Into<String>, quantity: impl Into<Quantity>) -> Self {
        Self {
            symbol: symbol.into(),
            chain: chain.into(),
            quantity: quantity.into(),
            selected: false,
        }
    }
}
