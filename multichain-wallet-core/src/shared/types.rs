use serde::{Deserialize, Serialize};

// Basic types shared across the core
pub type Address = String;
pub type ChainId = String;
pub type Quantity = String;

/// Notification kinds a wallet provider emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WalletEventKind {
    ChainChanged,
    AccountsChanged,
}

/// Notification payloads delivered to registered listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletEvent {
    ChainChanged(ChainId),
    AccountsChanged(Vec<Address>),
}

impl WalletEvent {
    pub fn kind(&self) -> WalletEventKind {
        match self {
            WalletEvent::ChainChanged(_) => WalletEventKind::ChainChanged,
            WalletEvent::AccountsChanged(_) => WalletEventKind::AccountsChanged,
        }
    }
}

/// Identifier of a registered wallet listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(pub u64);
