//! Balance reading
//!
//! Reads native and ERC-20 balances through a [`ChainHandle`]. Every failure
//! here is local: a failed native read or a non-conforming token contract is
//! logged and treated as "no balance", never as an aggregation error.

pub mod erc20;

use ethers::types::Address as EvmAddress;
use futures::future::join_all;

use crate::core::network_switch::ChainHandle;
use crate::domain::entities::{KnownToken, NetworkDescriptor, TokenHolding};
use crate::shared::error::WalletError;
use crate::shared::utils::format_units;

#[derive(Debug, Default, Clone, Copy)]
pub struct BalanceReader;

impl BalanceReader {
    pub fn new() -> Self {
        Self
    }

    /// Native balance of `address` on the handle's network, or None when it
    /// is zero or could not be read
    pub async fn read_native_balance(
        &self,
        handle: &ChainHandle<'_>,
        address: &str,
        network: &NetworkDescriptor,
    ) -> Option<TokenHolding> {
        match self.try_native_balance(handle, address, network).await {
            Ok(holding) => holding,
            Err(e) => {
                log::warn!(
                    "Failed to read {} balance on {} for {}: {}",
                    network.native_symbol, network.display_name, address, e
                );
                None
            }
        }
    }

    async fn try_native_balance(
        &self,
        handle: &ChainHandle<'_>,
        address: &str,
        network: &NetworkDescriptor,
    ) -> Result<Option<TokenHolding>, WalletError> {
        let raw = handle.native_balance(address).await?;
        if raw.is_zero() {
            return Ok(None);
        }
        let quantity = format_units(raw, network.native_decimals)?;
        Ok(Some(TokenHolding::new(
            network.native_symbol.as_str(),
            network.display_name.as_str(),
            quantity,
        )))
    }

    /// Non-zero balances of `tokens`, read concurrently, in the order given
    pub async fn read_token_balances(
        &self,
        handle: &ChainHandle<'_>,
        address: &str,
        tokens: &[KnownToken],
        network_display_name: &str,
    ) -> Vec<TokenHolding> {
        let reads = tokens
            .iter()
            .map(|token| self.read_token_balance(handle, address, token, network_display_name));
        join_all(reads).await.into_iter().flatten().collect()
    }

    async fn read_token_balance(
        &self,
        handle: &ChainHandle<'_>,
        address: &str,
        token: &KnownToken,
        network_display_name: &str,
    ) -> Option<TokenHolding> {
        match self.try_token_balance(handle, address, token, network_display_name).await {
            Ok(holding) => holding,
            Err(e) => {
                log::warn!(
                    "Skipping token {} ({}) on {}: {}",
                    token.symbol, token.address, network_display_name, e
                );
                None
            }
        }
    }

    async fn try_token_balance(
        &self,
        handle: &ChainHandle<'_>,
        address: &str,
        token: &KnownToken,
        network_display_name: &str,
    ) -> Result<Option<TokenHolding>, WalletError> {
        let contract: EvmAddress = token
            .address
            .parse()
            .map_err(|e| WalletError::validation(format!("Invalid token address {}: {}", token.address, e)))?;
        let owner: EvmAddress = address
            .parse()
            .map_err(|e| WalletError::validation(format!("Invalid holder address {}: {}", address, e)))?;

        let (balance, symbol, decimals) = futures::try_join!(
            erc20::balance_of(handle, contract, owner),
            erc20::symbol(handle, contract),
            erc20::decimals(handle, contract),
        )?;
        if balance.is_zero() {
            return Ok(None);
        }

        log::debug!("{} holds {} raw {} on {}", address, balance, symbol, network_display_name);
        let quantity = format_units(balance, decimals)?;
        Ok(Some(TokenHolding::new(symbol, network_display_name, quantity)))
    }
}
