//! Network entity for the wallet core

use serde::{Deserialize, Serialize};

use crate::shared::types::{Address, ChainId};
use crate::shared::utils::parse_chain_id;
use crate::shared::error::WalletError;

/// A fungible token contract probed on a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownToken {
    pub address: Address,
    pub symbol: String,
}

impl KnownToken {
    pub fn new(address: impl Into<Address>, symbol: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
        }
    }
}

/// A network the wallet can be switched to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    /// EIP-155 chain id, `0x`-prefixed hex
    pub id: ChainId,
    pub display_name: String,
    pub native_symbol: String,
    pub native_decimals: u32,
    pub rpc_endpoint: String,
    pub known_tokens: Vec<KnownToken>,
}

impl NetworkDescriptor {
    pub fn numeric_chain_id(&self) -> Result<u64, WalletError> {
        parse_chain_id(&self.id)
    }

    /// Parameters for `wallet_addEthereumChain`
    pub fn add_chain_params(&self) -> serde_json::Value {
        serde_json::json!([{
            "chainId": self.id,
            "chainName": self.display_name,
            "rpcUrls": [self.rpc_endpoint],
            "nativeCurrency": {
                "name": self.native_symbol,
                "symbol": self.native_symbol,
                "decimals": self.native_decimals,
            },
        }])
    }

    /// Parameters for `wallet_switchEthereumChain`
    pub fn switch_chain_params(&self) -> serde_json::Value {
        serde_json::json!([{ "chainId": self.id }])
    }
}
