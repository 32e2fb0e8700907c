//! Network switching
//!
//! Drives the wallet to a target network and hands out a [`ChainHandle`]
//! once the wallet has confirmed the switch. The wallet's active network is
//! global state, so a coordinator performs one switch at a time: a handle
//! borrows its coordinator and must be dropped before the next switch.
//! Coordinators driving the same wallet share a [`SwitchLock`], held for as
//! long as a handle is alive, so no other run can move the wallet away
//! underneath an outstanding handle.

use std::sync::Arc;
use std::time::Duration;

use ethers::types::{Address as EvmAddress, U256};
use serde_json::json;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::entities::NetworkDescriptor;
use crate::infrastructure::provider::{request_as, ListenerGuard, WalletProvider};
use crate::shared::constants::{
    BLOCK_TAG_LATEST, METHOD_ADD_CHAIN, METHOD_CALL, METHOD_CHAIN_ID, METHOD_GET_BALANCE, METHOD_SWITCH_CHAIN,
};
use crate::shared::error::{ProviderErrorKind, WalletError};
use crate::shared::types::{ChainId, WalletEvent, WalletEventKind};
use crate::shared::utils::{chain_ids_match, parse_hex_quantity};

/// Serializes network switches on one wallet across coordinators
#[derive(Debug, Clone, Default)]
pub struct SwitchLock(Arc<Mutex<()>>);

impl SwitchLock {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Read access bound to the network that was active when the handle was issued
pub struct ChainHandle<'a> {
    provider: &'a dyn WalletProvider,
    chain_id: ChainId,
    display_name: String,
    _active: MutexGuard<'a, ()>,
}

impl<'a> ChainHandle<'a> {
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Raw native balance of `address` in the smallest unit
    pub async fn native_balance(&self, address: &str) -> Result<U256, WalletError> {
        let raw: String = request_as(self.provider, METHOD_GET_BALANCE, json!([address, BLOCK_TAG_LATEST])).await?;
        self.ensure_current().await?;
        parse_hex_quantity(&raw)
    }

    /// Read-only contract call, returning the raw ABI-encoded output
    pub async fn call(&self, to: EvmAddress, data: &[u8]) -> Result<Vec<u8>, WalletError> {
        let params = json!([
            { "to": to, "data": format!("0x{}", hex::encode(data)) },
            BLOCK_TAG_LATEST
        ]);
        let raw: String = request_as(self.provider, METHOD_CALL, params).await?;
        self.ensure_current().await?;
        Ok(hex::decode(raw.trim_start_matches("0x"))?)
    }

    /// Fails once the wallet's active network is no longer the handle's,
    /// e.g. after a switch made in the wallet's own UI
    async fn ensure_current(&self) -> Result<(), WalletError> {
        let active: String = request_as(self.provider, METHOD_CHAIN_ID, json!([])).await?;
        if chain_ids_match(&active, &self.chain_id) {
            Ok(())
        } else {
            Err(WalletError::read(format!(
                "Active network changed from {} to {} during read",
                self.chain_id, active
            )))
        }
    }
}

impl std::fmt::Debug for ChainHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainHandle")
            .field("chain_id", &self.chain_id)
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Owns the transitions of the wallet's active network for one aggregation run
pub struct NetworkSwitchCoordinator {
    provider: Arc<dyn WalletProvider>,
    switch_timeout: Duration,
    lock: SwitchLock,
}

impl NetworkSwitchCoordinator {
    pub fn new(provider: Arc<dyn WalletProvider>, switch_timeout: Duration) -> Self {
        Self::with_lock(provider, switch_timeout, SwitchLock::new())
    }

    /// Coordinator that takes turns with every other holder of `lock`
    pub fn with_lock(provider: Arc<dyn WalletProvider>, switch_timeout: Duration, lock: SwitchLock) -> Self {
        Self {
            provider,
            switch_timeout,
            lock,
        }
    }

    /// Switch the wallet to `target` and wait for it to confirm.
    ///
    /// A network the wallet does not know is registered with
    /// `wallet_addEthereumChain` first. The chain-changed listener is
    /// registered before the request and removed on every exit path.
    pub async fn switch_to_network(&mut self, target: &NetworkDescriptor) -> Result<ChainHandle<'_>, WalletError> {
        let this = &*self;
        let active = this.lock.0.lock().await;
        let provider = Arc::clone(&this.provider);
        let mut listener = ListenerGuard::register(provider.as_ref(), WalletEventKind::ChainChanged);

        match request_as::<String>(provider.as_ref(), METHOD_CHAIN_ID, json!([])).await {
            Ok(current) if chain_ids_match(&current, &target.id) => {
                log::debug!("Wallet already on {} ({})", target.display_name, target.id);
                listener.release();
                return Ok(this.issue_handle(target, active));
            }
            Ok(_) => {}
            Err(e) => log::debug!("Could not read active chain before switching: {}", e),
        }

        log::info!("Switching wallet to {} ({})", target.display_name, target.id);
        match provider.request(METHOD_SWITCH_CHAIN, target.switch_chain_params()).await {
            Ok(_) => {}
            Err(err) if err.kind() == ProviderErrorKind::UnrecognizedChain => {
                log::info!("{} is unknown to the wallet, requesting it be added", target.display_name);
                provider
                    .request(METHOD_ADD_CHAIN, target.add_chain_params())
                    .await
                    .map_err(|e| {
                        log::warn!("Adding {} failed: {}", target.display_name, e);
                        WalletError::from(e)
                    })?;
            }
            Err(err) => return Err(err.into()),
        }

        wait_for_chain(&mut listener, &target.id, this.switch_timeout).await?;
        listener.release();
        log::debug!("Wallet confirmed switch to {}", target.id);
        Ok(this.issue_handle(target, active))
    }

    fn issue_handle<'a>(&'a self, target: &NetworkDescriptor, active: MutexGuard<'a, ()>) -> ChainHandle<'a> {
        ChainHandle {
            provider: self.provider.as_ref(),
            chain_id: target.id.clone(),
            display_name: target.display_name.clone(),
            _active: active,
        }
    }
}

async fn wait_for_chain(
    listener: &mut ListenerGuard<'_>,
    chain_id: &str,
    timeout: Duration,
) -> Result<(), WalletError> {
    let confirmation = async {
        while let Some(event) = listener.recv().await {
            match event {
                WalletEvent::ChainChanged(reported) if chain_ids_match(&reported, chain_id) => return Ok(()),
                WalletEvent::ChainChanged(reported) => {
                    log::debug!("Ignoring chainChanged to {} while waiting for {}", reported, chain_id)
                }
                WalletEvent::AccountsChanged(_) => {}
            }
        }
        Err(WalletError::connection("Wallet stopped delivering chain notifications"))
    };

    tokio::time::timeout(timeout, confirmation)
        .await
        .unwrap_or_else(|_| Err(WalletError::network_switch_timeout(chain_id, timeout.as_millis() as u64)))
}
