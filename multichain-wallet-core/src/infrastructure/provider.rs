//! Wallet provider boundary
//!
//! The injected wallet is an external collaborator. The core talks to it
//! through [`WalletProvider`]: JSON-RPC style requests plus listener
//! registration for chain and account notifications.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::shared::error::{ProviderRpcError, WalletError};
use crate::shared::types::{ListenerId, WalletEvent, WalletEventKind};

/// An injected EIP-1193 style wallet
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Issue a request and resolve with the raw JSON result
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError>;

    /// Deliver every `kind` notification to `sender` until the listener is removed
    fn add_listener(&self, kind: WalletEventKind, sender: mpsc::UnboundedSender<WalletEvent>) -> ListenerId;

    /// Returns false if the listener was already gone
    fn remove_listener(&self, id: ListenerId) -> bool;
}

/// Issue a request and deserialize its result, translating provider errors
pub async fn request_as<T>(provider: &dyn WalletProvider, method: &str, params: Value) -> Result<T, WalletError>
where
    T: DeserializeOwned,
{
    log::debug!("Wallet request {}", method);
    let value = provider.request(method, params).await?;
    serde_json::from_value(value)
        .map_err(|e| WalletError::decode(format!("Unexpected {} result: {}", method, e)))
}

/// A listener registration that is removed exactly once, when the guard is
/// released or dropped.
pub struct ListenerGuard<'a> {
    provider: &'a dyn WalletProvider,
    id: Option<ListenerId>,
    receiver: mpsc::UnboundedReceiver<WalletEvent>,
}

impl<'a> ListenerGuard<'a> {
    pub fn register(provider: &'a dyn WalletProvider, kind: WalletEventKind) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = provider.add_listener(kind, sender);
        log::debug!("Registered {:?} listener {:?}", kind, id);
        Self {
            provider,
            id: Some(id),
            receiver,
        }
    }

    /// Next notification, or None once the provider dropped the sender
    pub async fn recv(&mut self) -> Option<WalletEvent> {
        self.receiver.recv().await
    }

    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    /// Remove the listener now instead of at drop
    pub fn release(mut self) -> bool {
        self.remove()
    }

    fn remove(&mut self) -> bool {
        match self.id.take() {
            Some(id) => {
                log::debug!("Removing listener {:?}", id);
                self.provider.remove_listener(id)
            }
            None => false,
        }
    }
}

impl Drop for ListenerGuard<'_> {
    fn drop(&mut self) {
        self.remove();
    }
}

impl fmt::Debug for ListenerGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}
