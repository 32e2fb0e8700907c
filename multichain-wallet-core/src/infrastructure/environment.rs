//! Host environment probe
//!
//! Models what the surrounding page offers: whether there is a browsing
//! context at all, and whether a wallet provider has been injected into it.

use std::fmt;
use std::sync::Arc;

use crate::infrastructure::provider::WalletProvider;
use crate::shared::error::WalletError;

#[derive(Clone)]
pub enum WalletEnvironment {
    /// No browsing context (server-side rendering, CLI, tests)
    Headless,
    /// A browsing context, with or without an injected wallet
    Browser {
        provider: Option<Arc<dyn WalletProvider>>,
    },
}

impl WalletEnvironment {
    pub fn browser(provider: Arc<dyn WalletProvider>) -> Self {
        Self::Browser {
            provider: Some(provider),
        }
    }

    pub fn browser_without_wallet() -> Self {
        Self::Browser { provider: None }
    }

    pub fn has_browsing_context(&self) -> bool {
        matches!(self, Self::Browser { .. })
    }

    /// Pure probe, issues no wallet requests
    pub fn is_wallet_available(&self) -> bool {
        matches!(self, Self::Browser { provider: Some(_) })
    }

    /// The injected provider, or the error a connect attempt should fail with
    pub fn provider(&self) -> Result<Arc<dyn WalletProvider>, WalletError> {
        match self {
            Self::Headless => Err(WalletError::environment(
                "Wallet access requires a browser environment",
            )),
            Self::Browser { provider: None } => Err(WalletError::wallet_not_found(
                "No injected wallet provider found. Please install a browser wallet",
            )),
            Self::Browser {
                provider: Some(provider),
            } => Ok(provider.clone()),
        }
    }
}

impl fmt::Debug for WalletEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Headless => write!(f, "Headless"),
            Self::Browser { provider } => f
                .debug_struct("Browser")
                .field("wallet_injected", &provider.is_some())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::provider::MockWalletProvider;

    #[test]
    fn test_headless_has_no_context() {
        let env = WalletEnvironment::Headless;
        assert!(!env.has_browsing_context());
        assert!(!env.is_wallet_available());
        assert!(matches!(env.provider(), Err(WalletError::Environment(_))));
    }

    #[test]
    fn test_browser_without_wallet() {
        let env = WalletEnvironment::browser_without_wallet();
        assert!(env.has_browsing_context());
        assert!(!env.is_wallet_available());
        assert!(matches!(env.provider(), Err(WalletError::WalletNotFound(_))));
    }

    #[test]
    fn test_browser_with_wallet_makes_no_requests() {
        // A mock with no expectations panics on any call
        let env = WalletEnvironment::browser(Arc::new(MockWalletProvider::new()));
        assert!(env.is_wallet_available());
        assert!(env.provider().is_ok());
    }
}
