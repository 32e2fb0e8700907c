//! Chain registry
//!
//! Static table of the networks the aggregator visits, in visiting order,
//! together with the token contracts probed on each of them.

use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::domain::entities::{KnownToken, NetworkDescriptor};
use crate::shared::constants::{ENV_RPC_PREFIX, MAX_DECIMALS};
use crate::shared::error::WalletError;
use crate::shared::utils::{env_key_for, parse_chain_id, validate_ethereum_address};

fn network(
    id: &str,
    display_name: &str,
    native_symbol: &str,
    rpc_endpoint: &str,
    tokens: &[(&str, &str)],
) -> NetworkDescriptor {
    NetworkDescriptor {
        id: id.to_string(),
        display_name: display_name.to_string(),
        native_symbol: native_symbol.to_string(),
        native_decimals: 18,
        rpc_endpoint: rpc_endpoint.to_string(),
        known_tokens: tokens
            .iter()
            .map(|(address, symbol)| KnownToken::new(*address, *symbol))
            .collect(),
    }
}

lazy_static! {
    static ref DEFAULT_NETWORKS: Vec<NetworkDescriptor> = vec![
        network("0x1", "Ethereum", "ETH", "https://cloudflare-eth.com", &[
            ("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "USDC"),
            ("0xdAC17F958D2ee523a2206206994597C13D831ec7", "USDT"),
            ("0x6B175474E89094C44Da98b954EedeAC495271d0F", "DAI"),
        ]),
        network("0x89", "Polygon", "POL", "https://polygon-rpc.com", &[
            ("0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359", "USDC"),
            ("0xc2132D05D31c914a87C6611C10748AEb04B58e8F", "USDT"),
        ]),
        network("0x38", "BNB Smart Chain", "BNB", "https://bsc-dataseed.binance.org", &[
            ("0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d", "USDC"),
            ("0x55d398326f99059fF775485246999027B3197955", "USDT"),
        ]),
        network("0xa4b1", "Arbitrum One", "ETH", "https://arb1.arbitrum.io/rpc", &[
            ("0xaf88d065e77c8cC2239327C5EDb3A432268e5831", "USDC"),
            ("0xFd086bC7CD5C481DCC9C85ebE478A1C0b69FCbb9", "USDT"),
        ]),
        network("0x2105", "Base", "ETH", "https://mainnet.base.org", &[
            ("0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913", "USDC"),
        ]),
        network("0xa86a", "Avalanche C-Chain", "AVAX", "https://api.avax.network/ext/bc/C/rpc", &[
            ("0xB97EF9Ef8734C71904D8002F8b6Bc66Dd9c48a6E", "USDC"),
        ]),
    ];
}

/// Ordered, read-only set of supported networks
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    networks: Vec<NetworkDescriptor>,
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self {
            networks: DEFAULT_NETWORKS.clone(),
        }
    }
}

impl ChainRegistry {
    /// Build a registry from an explicit network list
    pub fn new(networks: Vec<NetworkDescriptor>) -> Result<Self, WalletError> {
        let registry = Self { networks };
        registry.validate()?;
        Ok(registry)
    }

    /// Default registry with RPC endpoints overridden from `.env` / the environment
    pub fn from_env() -> Result<Self, WalletError> {
        dotenv::dotenv().ok();
        Self::default().with_rpc_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `WALLET_CORE_RPC_<NETWORK>` overrides resolved through `lookup`
    pub fn with_rpc_overrides<F>(mut self, lookup: F) -> Result<Self, WalletError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for network in &mut self.networks {
            let key = format!("{}{}", ENV_RPC_PREFIX, env_key_for(&network.display_name));
            if let Some(url) = lookup(&key).filter(|url| !url.trim().is_empty()) {
                log::debug!("RPC endpoint for {} overridden by {}", network.display_name, key);
                network.rpc_endpoint = url.trim().to_string();
            }
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        if self.networks.is_empty() {
            return Err(WalletError::config("Chain registry has no networks"));
        }

        let mut seen = HashSet::new();
        for network in &self.networks {
            let numeric = parse_chain_id(&network.id)
                .map_err(|e| WalletError::config(format!("{}: {}", network.display_name, e)))?;
            if !seen.insert(numeric) {
                return Err(WalletError::config(format!("Duplicate chain id {}", network.id)));
            }
            if network.display_name.trim().is_empty() {
                return Err(WalletError::config(format!("Chain {} has no display name", network.id)));
            }
            if network.rpc_endpoint.trim().is_empty() {
                return Err(WalletError::config(format!(
                    "RPC URL not set for {}",
                    network.display_name
                )));
            }
            if network.native_decimals > MAX_DECIMALS {
                return Err(WalletError::config(format!(
                    "{} declares {} native decimals, at most {} are supported",
                    network.display_name, network.native_decimals, MAX_DECIMALS
                )));
            }
            for token in &network.known_tokens {
                validate_ethereum_address(&token.address).map_err(|e| {
                    WalletError::config(format!(
                        "Token {} on {}: {}",
                        token.symbol, network.display_name, e
                    ))
                })?;
            }
        }
        Ok(())
    }

    pub fn networks(&self) -> &[NetworkDescriptor] {
        &self.networks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NetworkDescriptor> {
        self.networks.iter()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Look up a network by chain id (case and padding insensitive)
    pub fn get(&self, chain_id: &str) -> Option<&NetworkDescriptor> {
        let wanted = parse_chain_id(chain_id).ok()?;
        self.networks
            .iter()
            .find(|network| network.numeric_chain_id().ok() == Some(wanted))
    }

    pub fn contains(&self, chain_id: &str) -> bool {
        self.get(chain_id).is_some()
    }
}

impl<'a> IntoIterator for &'a ChainRegistry {
    type Item = &'a NetworkDescriptor;
    type IntoIter = std::slice::Iter<'a, NetworkDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.networks.iter()
    }
}
