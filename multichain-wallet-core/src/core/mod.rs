//! Core aggregation functionality
//!
//! This module contains the network switch coordinator, the balance reader,
//! the holdings aggregator and the account connector built on top of them.

pub mod network_switch;
pub mod balance;
pub mod aggregator;
pub mod connector;

// Re-export core components
pub use network_switch::{ChainHandle, NetworkSwitchCoordinator, SwitchLock};
pub use balance::BalanceReader;
pub use aggregator::HoldingsAggregator;
pub use connector::{AccountConnector, AccountsSubscription};
