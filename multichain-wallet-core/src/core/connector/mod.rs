//! Account connection
//!
//! Entry point for the UI layer: authorizes accounts with the injected wallet,
//! aggregates holdings for every authorized address and relays account-change
//! notifications.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::aggregator::HoldingsAggregator;
use crate::domain::entities::Account;
use crate::domain::repositories::ChainRegistry;
use crate::infrastructure::config::AggregatorConfig;
use crate::infrastructure::environment::WalletEnvironment;
use crate::infrastructure::provider::WalletProvider;
use crate::shared::constants::METHOD_REQUEST_ACCOUNTS;
use crate::shared::error::{ProviderErrorKind, WalletError};
use crate::shared::types::{Address, ListenerId, WalletEvent, WalletEventKind};

pub struct AccountConnector {
    environment: WalletEnvironment,
    registry: Arc<ChainRegistry>,
    config: AggregatorConfig,
}

impl AccountConnector {
    pub fn new(environment: WalletEnvironment, registry: Arc<ChainRegistry>, config: AggregatorConfig) -> Self {
        Self {
            environment,
            registry,
            config,
        }
    }

    /// Whether a wallet is injected. Makes no wallet calls.
    pub fn is_wallet_available(&self) -> bool {
        self.environment.is_wallet_available()
    }

    /// Authorize with the wallet and build one [`Account`] per authorized
    /// address, in the order the wallet returned them
    pub async fn connect(&self) -> Result<Vec<Account>, WalletError> {
        let provider = self.environment.provider()?;

        let addresses: Vec<Address> = match provider.request(METHOD_REQUEST_ACCOUNTS, json!([])).await {
            Ok(value) => serde_json::from_value(value)
                .map_err(|e| WalletError::connection(format!("Malformed account list: {}", e)))?,
            Err(e) if e.kind() == ProviderErrorKind::UserRejected => {
                log::info!("Account authorization rejected: {}", e.message);
                return Err(WalletError::user_rejected("User rejected the connection request"));
            }
            Err(e) => {
                log::error!("Account authorization failed: {}", e);
                return Err(WalletError::connection(e.message));
            }
        };

        if addresses.is_empty() {
            return Err(WalletError::no_accounts_found("The wallet did not authorize any accounts"));
        }

        log::info!("Connected {} account(s)", addresses.len());
        Ok(self.build_accounts(provider, addresses).await)
    }

    /// Rebuild accounts for addresses already known to be authorized,
    /// without prompting the wallet again
    pub async fn refresh(&self, addresses: &[Address]) -> Result<Vec<Account>, WalletError> {
        let provider = self.environment.provider()?;
        Ok(self.build_accounts(provider, addresses.to_vec()).await)
    }

    /// Deliver every new account list the wallet reports until the returned
    /// subscription is unsubscribed or dropped
    pub fn on_accounts_changed<F>(&self, callback: F) -> Result<AccountsSubscription, WalletError>
    where
        F: Fn(Vec<Address>) + Send + Sync + 'static,
    {
        let provider = self.environment.provider()?;
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let id = provider.add_listener(WalletEventKind::AccountsChanged, sender);
        log::debug!("Registered accounts listener {:?}", id);

        let task = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                if let WalletEvent::AccountsChanged(accounts) = event {
                    callback(accounts);
                }
            }
        });

        Ok(AccountsSubscription {
            provider,
            id: Some(id),
            task,
        })
    }

    async fn build_accounts(&self, provider: Arc<dyn WalletProvider>, addresses: Vec<Address>) -> Vec<Account> {
        let aggregator = HoldingsAggregator::new(provider, Arc::clone(&self.registry), self.config);
        let holdings = join_all(addresses.iter().map(|address| aggregator.aggregate(address))).await;

        addresses
            .into_iter()
            .zip(holdings)
            .map(|(address, holdings)| Account::new(address, holdings))
            .collect()
    }
}

/// Live accounts-changed subscription
pub struct AccountsSubscription {
    provider: Arc<dyn WalletProvider>,
    id: Option<ListenerId>,
    task: JoinHandle<()>,
}

impl AccountsSubscription {
    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    /// Stop delivering notifications. Returns false if already unsubscribed.
    pub fn unsubscribe(&mut self) -> bool {
        match self.id.take() {
            Some(id) => {
                self.task.abort();
                self.provider.remove_listener(id)
            }
            None => false,
        }
    }
}

impl Drop for AccountsSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for AccountsSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountsSubscription").field("id", &self.id).finish()
    }
}
