//! Error handling for the wallet core
//!
//! This module defines the error types used throughout the wallet core.
//! Wallet provider failures arrive as [`ProviderRpcError`] and are translated
//! once into [`WalletError`], so inner components branch on error kinds rather
//! than on numeric codes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    CODE_CHAIN_DISCONNECTED, CODE_DISCONNECTED, CODE_UNAUTHORIZED, CODE_UNRECOGNIZED_CHAIN,
    CODE_UNSUPPORTED_METHOD, CODE_USER_REJECTED,
};

/// Semantic kind of a wallet provider error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderErrorKind {
    UserRejected,
    Unauthorized,
    UnsupportedMethod,
    Disconnected,
    ChainDisconnected,
    UnrecognizedChain,
    Other(i64),
}

impl From<i64> for ProviderErrorKind {
    fn from(code: i64) -> Self {
        match code {
            CODE_USER_REJECTED => Self::UserRejected,
            CODE_UNAUTHORIZED => Self::Unauthorized,
            CODE_UNSUPPORTED_METHOD => Self::UnsupportedMethod,
            CODE_DISCONNECTED => Self::Disconnected,
            CODE_CHAIN_DISCONNECTED => Self::ChainDisconnected,
            CODE_UNRECOGNIZED_CHAIN => Self::UnrecognizedChain,
            other => Self::Other(other),
        }
    }
}

/// Error returned by the injected wallet provider for a single request
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("provider error {code}: {message}")]
pub struct ProviderRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ProviderRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn kind(&self) -> ProviderErrorKind {
        ProviderErrorKind::from(self.code)
    }
}

/// Wallet error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WalletError {
    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("User rejected the request: {0}")]
    UserRejected(String),

    #[error("No accounts found: {0}")]
    NoAccountsFound(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Network switch to {chain_id} timed out after {timeout_ms}ms")]
    NetworkSwitchTimeout { chain_id: String, timeout_ms: u64 },

    #[error("Unrecognized network: {0}")]
    UnrecognizedNetwork(String),

    #[error("Provider error {code}: {message}")]
    Provider { code: i64, message: String },

    #[error("Read error: {0}")]
    Read(String),

    #[error("Decoding error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl WalletError {
    /// Create an environment error
    pub fn environment(message: impl Into<String>) -> Self {
        Self::Environment(message.into())
    }

    /// Create a wallet not found error
    pub fn wallet_not_found(message: impl Into<String>) -> Self {
        Self::WalletNotFound(message.into())
    }

    /// Create a user rejected error
    pub fn user_rejected(message: impl Into<String>) -> Self {
        Self::UserRejected(message.into())
    }

    /// Create a no accounts found error
    pub fn no_accounts_found(message: impl Into<String>) -> Self {
        Self::NoAccountsFound(message.into())
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a network switch timeout error
    pub fn network_switch_timeout(chain_id: impl Into<String>, timeout_ms: u64) -> Self {
        Self::NetworkSwitchTimeout {
            chain_id: chain_id.into(),
            timeout_ms,
        }
    }

    /// Create a read error
    pub fn read(message: impl Into<String>) -> Self {
        Self::Read(message.into())
    }

    /// Create a decoding error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Errors that stay local to one network or one asset when raised during
    /// aggregation. A rejected add-network prompt only costs that network.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NetworkSwitchTimeout { .. }
                | Self::UnrecognizedNetwork(_)
                | Self::Provider { .. }
                | Self::Read(_)
                | Self::Decode(_)
                | Self::UserRejected(_)
                | Self::Connection(_)
        )
    }
}

impl From<ProviderRpcError> for WalletError {
    fn from(err: ProviderRpcError) -> Self {
        match err.kind() {
            ProviderErrorKind::UserRejected => Self::UserRejected(err.message),
            ProviderErrorKind::UnrecognizedChain => Self::UnrecognizedNetwork(err.message),
            ProviderErrorKind::Disconnected | ProviderErrorKind::ChainDisconnected => {
                Self::Connection(err.message)
            }
            _ => Self::Provider {
                code: err.code,
                message: err.message,
            },
        }
    }
}

impl From<hex::FromHexError> for WalletError {
    fn from(err: hex::FromHexError) -> Self {
        Self::decode(format!("Hex decoding error: {}", err))
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(format!("JSON error: {}", err))
    }
}

impl From<ethers::abi::Error> for WalletError {
    fn from(err: ethers::abi::Error) -> Self {
        Self::decode(format!("ABI error: {}", err))
    }
}
