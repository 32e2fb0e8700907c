//! Multichain Wallet Core
//!
//! Aggregates a user's balances across several EVM networks through a single
//! injected browser wallet.
//!
//! ## Architecture
//!
//! - **Core**: Network switching, balance reads, aggregation, account connection
//! - **Domain**: Networks, holdings, accounts and the chain registry
//! - **Infrastructure**: Wallet provider boundary, environment probe, configuration
//! - **Shared**: Common types, constants, errors and utilities
//!
//! ## Usage
//!
//! ```rust,ignore
//! use multichain_wallet_core::{init_wallet_core, WalletEnvironment};
//!
//! let connector = init_wallet_core(WalletEnvironment::browser(provider))?;
//! if connector.is_wallet_available() {
//!     for account in connector.connect().await? {
//!         println!("{}: {} holdings", account.address, account.holdings.len());
//!     }
//! }
//! ```

use std::sync::Arc;

use dotenv::dotenv;

pub mod core;
pub mod domain;
pub mod shared;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod testing;

// Re-export specific components
pub use crate::core::{
    AccountConnector, AccountsSubscription, BalanceReader, ChainHandle, HoldingsAggregator,
    NetworkSwitchCoordinator, SwitchLock,
};

// Re-export domain entities
pub use domain::entities::{
    Account, AggregationReport, KnownToken, NetworkDescriptor, NetworkScan, NetworkScanStatus, TokenHolding,
};
pub use domain::repositories::ChainRegistry;

// Re-export infrastructure
pub use infrastructure::{AggregatorConfig, ListenerGuard, WalletEnvironment, WalletProvider};

// Re-export shared types
pub use shared::error::{ProviderErrorKind, ProviderRpcError, WalletError};
pub use shared::types::{ListenerId, WalletEvent, WalletEventKind};

/// Initialize logging. Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(shared::constants::LOG_LEVEL),
    )
    .try_init();
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize the wallet core with configuration from .env or safe defaults
pub fn init_wallet_core(environment: WalletEnvironment) -> Result<AccountConnector, WalletError> {
    dotenv().ok(); // Load .env if present
    init_logging();

    let registry = ChainRegistry::from_env()?;
    let config = AggregatorConfig::from_env()?;
    log::info!(
        "{} v{} tracking {} networks (switch timeout {:?}, delay {:?})",
        NAME,
        VERSION,
        registry.len(),
        config.switch_timeout,
        config.inter_network_delay
    );

    Ok(AccountConnector::new(environment, Arc::new(registry), config))
}
