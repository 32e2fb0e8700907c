//! Account entity and aggregation report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::token::TokenHolding;
use crate::shared::types::{Address, ChainId};

/// One authorized wallet address and everything it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    pub holdings: Vec<TokenHolding>,
}

impl Account {
    pub fn new(address: impl Into<Address>, holdings: Vec<TokenHolding>) -> Self {
        Self {
            address: address.into(),
            holdings,
        }
    }
}

/// Outcome of visiting a single network during aggregation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NetworkScanStatus {
    Scanned { assets: usize },
    TimedOut,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkScan {
    pub chain_id: ChainId,
    pub display_name: String,
    #[serde(flatten)]
    pub status: NetworkScanStatus,
}

/// Holdings for one address plus the per-network outcome of the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationReport {
    pub address: Address,
    pub holdings: Vec<TokenHolding>,
    pub networks: Vec<NetworkScan>,
    pub completed_at: DateTime<Utc>,
}

impl AggregationReport {
    /// Networks that were skipped because the switch failed or timed out
    pub fn skipped_networks(&self) -> impl Iterator<Item = &NetworkScan> {
        self.networks
            .iter()
            .filter(|scan| !matches!(scan.status, NetworkScanStatus::Scanned { .. }))
    }

    pub fn into_account(self) -> Account {
        Account::new(self.address, self.holdings)
    }
}
