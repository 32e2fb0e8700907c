//! Holdings aggregation
//!
//! Visits every registered network for one address, strictly one after
//! another, and collects the non-zero balances found on each. A network that
//! cannot be switched to is logged and skipped; the run itself never fails.

use std::sync::Arc;

use chrono::Utc;

use crate::core::balance::BalanceReader;
use crate::core::network_switch::{NetworkSwitchCoordinator, SwitchLock};
use crate::domain::entities::{AggregationReport, NetworkDescriptor, NetworkScan, NetworkScanStatus, TokenHolding};
use crate::domain::repositories::ChainRegistry;
use crate::infrastructure::config::AggregatorConfig;
use crate::infrastructure::environment::WalletEnvironment;
use crate::infrastructure::provider::WalletProvider;
use crate::shared::error::WalletError;
use crate::shared::utils::generate_id;

#[derive(Clone)]
pub struct HoldingsAggregator {
    provider: Arc<dyn WalletProvider>,
    registry: Arc<ChainRegistry>,
    config: AggregatorConfig,
    reader: BalanceReader,
    lock: SwitchLock,
}

impl HoldingsAggregator {
    pub fn new(provider: Arc<dyn WalletProvider>, registry: Arc<ChainRegistry>, config: AggregatorConfig) -> Self {
        Self {
            provider,
            registry,
            config,
            reader: BalanceReader::new(),
            lock: SwitchLock::new(),
        }
    }

    /// Build an aggregator over the environment's injected wallet
    pub fn from_environment(
        environment: &WalletEnvironment,
        registry: Arc<ChainRegistry>,
        config: AggregatorConfig,
    ) -> Result<Self, WalletError> {
        Ok(Self::new(environment.provider()?, registry, config))
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// All non-zero holdings of `address`, in registry order with the native
    /// balance ahead of token balances on each network
    pub async fn aggregate(&self, address: &str) -> Vec<TokenHolding> {
        self.aggregate_with_report(address).await.holdings
    }

    /// Like [`aggregate`](Self::aggregate), plus the outcome of every network visit
    pub async fn aggregate_with_report(&self, address: &str) -> AggregationReport {
        let run_id = generate_id();
        log::info!(
            "[{}] Aggregating holdings for {} across {} networks",
            run_id,
            address,
            self.registry.len()
        );

        // Runs sharing this aggregator take turns on the wallet, one network at a time
        let mut coordinator = NetworkSwitchCoordinator::with_lock(
            Arc::clone(&self.provider),
            self.config.switch_timeout,
            self.lock.clone(),
        );
        let mut holdings = Vec::new();
        let mut networks = Vec::with_capacity(self.registry.len());

        for (index, network) in self.registry.iter().enumerate() {
            if index > 0 && !self.config.inter_network_delay.is_zero() {
                tokio::time::sleep(self.config.inter_network_delay).await;
            }

            let status = match self.scan_network(&mut coordinator, address, network).await {
                Ok(found) => {
                    let assets = found.len();
                    holdings.extend(found);
                    NetworkScanStatus::Scanned { assets }
                }
                Err(e) => {
                    if e.is_recoverable() {
                        log::warn!("[{}] Skipping {}: {}", run_id, network.display_name, e);
                    } else {
                        log::error!("[{}] Skipping {}: {}", run_id, network.display_name, e);
                    }
                    match e {
                        WalletError::NetworkSwitchTimeout { .. } => NetworkScanStatus::TimedOut,
                        other => NetworkScanStatus::Failed {
                            reason: other.to_string(),
                        },
                    }
                }
            };
            networks.push(NetworkScan {
                chain_id: network.id.clone(),
                display_name: network.display_name.clone(),
                status,
            });
        }

        log::info!("[{}] Found {} holdings for {}", run_id, holdings.len(), address);
        AggregationReport {
            address: address.to_string(),
            holdings,
            networks,
            completed_at: Utc::now(),
        }
    }

    async fn scan_network(
        &self,
        coordinator: &mut NetworkSwitchCoordinator,
        address: &str,
        network: &NetworkDescriptor,
    ) -> Result<Vec<TokenHolding>, WalletError> {
        let handle = coordinator.switch_to_network(network).await?;

        let mut found = Vec::new();
        if let Some(native) = self.reader.read_native_balance(&handle, address, network).await {
            found.push(native);
        }
        found.extend(
            self.reader
                .read_token_balances(&handle, address, &network.known_tokens, &network.display_name)
                .await,
        );
        Ok(found)
    }
}
