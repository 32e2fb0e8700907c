//! Simulated wallet used by the unit tests
//!
//! Behaves like an injected browser wallet backed by an in-memory ledger:
//! one active network shared by every caller, chain-changed notifications
//! after successful switches, 4902 for networks it has not been told about,
//! and ERC-20 reads answered with ABI-encoded results.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use ethers::abi::{self, ParamType, Token};
use ethers::types::U256;
use ethers::utils::id;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::domain::repositories::ChainRegistry;
use crate::infrastructure::provider::WalletProvider;
use crate::shared::constants::*;
use crate::shared::error::ProviderRpcError;
use crate::shared::types::{ListenerId, WalletEvent, WalletEventKind};
use crate::shared::utils::parse_chain_id;

pub const ALICE: &str = "0x1111111111111111111111111111111111111111";
pub const BOB: &str = "0x2222222222222222222222222222222222222222";

/// First four default networks: Ethereum, Polygon, BNB Smart Chain, Arbitrum One
pub fn four_network_registry() -> ChainRegistry {
    ChainRegistry::new(ChainRegistry::default().networks()[..4].to_vec())
        .expect("Failed to build test registry")
}

/// `whole` units of an asset with `decimals` precision
pub fn units(whole: u64, decimals: usize) -> U256 {
    U256::from(whole) * U256::exp10(decimals)
}

fn chain_key(chain_id: &str) -> u64 {
    parse_chain_id(chain_id).expect("Invalid chain id in test setup")
}

#[derive(Debug, Clone)]
struct SimToken {
    symbol: String,
    decimals: u8,
    balances: HashMap<String, U256>,
    broken: bool,
}

/// Interval between a switch request and removal of the switch's listener
#[derive(Debug, Clone)]
pub struct SwitchInterval {
    pub chain_id: String,
    pub started: Instant,
    pub ended: Option<Instant>,
}

struct State {
    active_chain: u64,
    known_chains: HashSet<u64>,
    accounts: Result<Vec<String>, ProviderRpcError>,
    native: HashMap<(u64, String), U256>,
    tokens: HashMap<(u64, String), SimToken>,
    silent_chains: HashSet<u64>,
    failing_native: HashSet<u64>,
    reject_add: bool,
    confirm_delay: Duration,
    listeners: BTreeMap<ListenerId, (WalletEventKind, mpsc::UnboundedSender<WalletEvent>)>,
    next_listener: u64,
    listeners_added: usize,
    listeners_removed: usize,
    calls: Vec<String>,
    switches: Vec<SwitchInterval>,
}

#[derive(Clone)]
pub struct SimulatedWallet {
    state: Arc<Mutex<State>>,
}

impl SimulatedWallet {
    /// Wallet currently on `active_chain`, aware of `known_chains`
    pub fn new(active_chain: &str, known_chains: &[&str]) -> Self {
        let mut known: HashSet<u64> = known_chains.iter().map(|c| chain_key(c)).collect();
        known.insert(chain_key(active_chain));
        Self {
            state: Arc::new(Mutex::new(State {
                active_chain: chain_key(active_chain),
                known_chains: known,
                accounts: Ok(vec![]),
                native: HashMap::new(),
                tokens: HashMap::new(),
                silent_chains: HashSet::new(),
                failing_native: HashSet::new(),
                reject_add: false,
                confirm_delay: Duration::ZERO,
                listeners: BTreeMap::new(),
                next_listener: 1,
                listeners_added: 0,
                listeners_removed: 0,
                calls: Vec::new(),
                switches: Vec::new(),
            })),
        }
    }

    /// Wallet on Ethereum that knows every network of [`four_network_registry`]
    pub fn with_four_networks() -> Self {
        Self::new("0x1", &["0x1", "0x89", "0x38", "0xa4b1"])
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("Simulated wallet state poisoned")
    }

    pub fn with_accounts(self, accounts: &[&str]) -> Self {
        self.lock().accounts = Ok(accounts.iter().map(|a| a.to_string()).collect());
        self
    }

    pub fn rejecting_accounts(self, error: ProviderRpcError) -> Self {
        self.lock().accounts = Err(error);
        self
    }

    pub fn with_native(self, chain_id: &str, holder: &str, amount: U256) -> Self {
        self.lock()
            .native
            .insert((chain_key(chain_id), holder.to_lowercase()), amount);
        self
    }

    pub fn with_token(self, chain_id: &str, token: &str, symbol: &str, decimals: u8) -> Self {
        self.lock().tokens.insert(
            (chain_key(chain_id), token.to_lowercase()),
            SimToken {
                symbol: symbol.to_string(),
                decimals,
                balances: HashMap::new(),
                broken: false,
            },
        );
        self
    }

    pub fn with_token_balance(self, chain_id: &str, token: &str, holder: &str, amount: U256) -> Self {
        {
            let mut state = self.lock();
            let entry = state
                .tokens
                .get_mut(&(chain_key(chain_id), token.to_lowercase()))
                .expect("Token must be registered with with_token first");
            entry.balances.insert(holder.to_lowercase(), amount);
        }
        self
    }

    /// Every call against this contract reverts
    pub fn with_broken_token(self, chain_id: &str, token: &str) -> Self {
        if let Some(entry) = self
            .lock()
            .tokens
            .get_mut(&(chain_key(chain_id), token.to_lowercase()))
        {
            entry.broken = true;
        }
        self
    }

    /// Switch requests to this chain are accepted but never confirmed
    pub fn with_silent_chain(self, chain_id: &str) -> Self {
        self.lock().silent_chains.insert(chain_key(chain_id));
        self
    }

    pub fn with_failing_native(self, chain_id: &str) -> Self {
        self.lock().failing_native.insert(chain_key(chain_id));
        self
    }

    pub fn rejecting_add_chain(self) -> Self {
        self.lock().reject_add = true;
        self
    }

    pub fn forgetting_chain(self, chain_id: &str) -> Self {
        self.lock().known_chains.remove(&chain_key(chain_id));
        self
    }

    pub fn with_confirm_delay(self, delay: Duration) -> Self {
        self.lock().confirm_delay = delay;
        self
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|m| m.as_str() == method).count()
    }

    pub fn active_listeners(&self) -> usize {
        self.lock().listeners.len()
    }

    pub fn listeners_added(&self) -> usize {
        self.lock().listeners_added
    }

    pub fn listeners_removed(&self) -> usize {
        self.lock().listeners_removed
    }

    pub fn switch_intervals(&self) -> Vec<SwitchInterval> {
        self.lock().switches.clone()
    }

    pub fn active_chain(&self) -> u64 {
        self.lock().active_chain
    }

    /// The user picks another network in the wallet's own UI
    pub fn switch_externally(&self, chain_id: &str) {
        self.confirm_switch(chain_key(chain_id));
    }

    pub fn emit_accounts_changed(&self, accounts: &[&str]) {
        let accounts = accounts.iter().map(|a| a.to_string()).collect();
        broadcast(&self.lock(), WalletEvent::AccountsChanged(accounts));
    }

    fn confirm_switch(&self, chain: u64) {
        let delay = {
            let mut state = self.lock();
            state.active_chain = chain;
            state.confirm_delay
        };
        let event = WalletEvent::ChainChanged(format!("{:#x}", chain));
        if delay.is_zero() {
            broadcast(&self.lock(), event);
        } else {
            let wallet = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                broadcast(&wallet.lock(), event);
            });
        }
    }

    fn switch_chain(&self, params: &Value) -> Result<Value, ProviderRpcError> {
        let chain = requested_chain(params)?;
        let (known, silent) = {
            let mut state = self.lock();
            state.switches.push(SwitchInterval {
                chain_id: format!("{:#x}", chain),
                started: Instant::now(),
                ended: None,
            });
            (state.known_chains.contains(&chain), state.silent_chains.contains(&chain))
        };
        if !known {
            return Err(ProviderRpcError::new(
                CODE_UNRECOGNIZED_CHAIN,
                format!("Unrecognized chain ID {:#x}. Try adding the chain using wallet_addEthereumChain first.", chain),
            ));
        }
        if !silent {
            self.confirm_switch(chain);
        }
        Ok(Value::Null)
    }

    fn add_chain(&self, params: &Value) -> Result<Value, ProviderRpcError> {
        let chain = requested_chain(params)?;
        {
            let mut state = self.lock();
            if state.reject_add {
                return Err(ProviderRpcError::new(CODE_USER_REJECTED, "User rejected the request."));
            }
            state.known_chains.insert(chain);
        }
        // Adding a chain also switches to it
        self.confirm_switch(chain);
        Ok(Value::Null)
    }

    fn get_balance(&self, params: &Value) -> Result<Value, ProviderRpcError> {
        let holder = params[0]
            .as_str()
            .ok_or_else(|| ProviderRpcError::new(-32602, "Invalid params"))?
            .to_lowercase();
        let state = self.lock();
        if state.failing_native.contains(&state.active_chain) {
            return Err(ProviderRpcError::new(-32603, "Internal JSON-RPC error."));
        }
        let balance = state
            .native
            .get(&(state.active_chain, holder))
            .copied()
            .unwrap_or_default();
        Ok(json!(format!("0x{:x}", balance)))
    }

    fn call(&self, params: &Value) -> Result<Value, ProviderRpcError> {
        let invalid = || ProviderRpcError::new(-32602, "Invalid params");
        let to = params[0]["to"].as_str().ok_or_else(invalid)?.to_lowercase();
        let data = params[0]["data"].as_str().ok_or_else(invalid)?;
        let data = hex::decode(data.trim_start_matches("0x")).map_err(|_| invalid())?;
        if data.len() < 4 {
            return Err(invalid());
        }

        let state = self.lock();
        let Some(token) = state.tokens.get(&(state.active_chain, to)) else {
            // No contract deployed at this address on the active chain
            return Ok(json!("0x"));
        };
        if token.broken {
            return Err(ProviderRpcError::new(-32000, "execution reverted"));
        }

        let selector = &data[..4];
        let output = if selector == id(ERC20_BALANCE_OF) {
            let decoded = abi::decode(&[ParamType::Address], &data[4..]).map_err(|_| invalid())?;
            let holder = match decoded.first() {
                Some(Token::Address(address)) => format!("{:?}", address),
                _ => return Err(invalid()),
            };
            let balance = token.balances.get(&holder).copied().unwrap_or_default();
            abi::encode(&[Token::Uint(balance)])
        } else if selector == id(ERC20_SYMBOL) {
            abi::encode(&[Token::String(token.symbol.clone())])
        } else if selector == id(ERC20_DECIMALS) {
            abi::encode(&[Token::Uint(U256::from(token.decimals))])
        } else {
            return Err(ProviderRpcError::new(-32000, "execution reverted"));
        };
        Ok(json!(format!("0x{}", hex::encode(output))))
    }
}

fn broadcast(state: &State, event: WalletEvent) {
    for (kind, sender) in state.listeners.values() {
        if *kind == event.kind() {
            let _ = sender.send(event.clone());
        }
    }
}

fn requested_chain(params: &Value) -> Result<u64, ProviderRpcError> {
    params[0]["chainId"]
        .as_str()
        .and_then(|c| parse_chain_id(c).ok())
        .ok_or_else(|| ProviderRpcError::new(-32602, "Invalid chainId"))
}

#[async_trait]
impl WalletProvider for SimulatedWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        self.lock().calls.push(method.to_string());
        match method {
            METHOD_REQUEST_ACCOUNTS => self.lock().accounts.clone().map(|a| json!(a)),
            METHOD_CHAIN_ID => Ok(json!(format!("{:#x}", self.lock().active_chain))),
            METHOD_SWITCH_CHAIN => self.switch_chain(&params),
            METHOD_ADD_CHAIN => self.add_chain(&params),
            METHOD_GET_BALANCE => self.get_balance(&params),
            METHOD_CALL => self.call(&params),
            other => Err(ProviderRpcError::new(
                CODE_UNSUPPORTED_METHOD,
                format!("Method {} not supported", other),
            )),
        }
    }

    fn add_listener(&self, kind: WalletEventKind, sender: mpsc::UnboundedSender<WalletEvent>) -> ListenerId {
        let mut state = self.lock();
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners_added += 1;
        state.listeners.insert(id, (kind, sender));
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut state = self.lock();
        match state.listeners.remove(&id) {
            Some((kind, _)) => {
                state.listeners_removed += 1;
                if kind == WalletEventKind::ChainChanged {
                    let now = Instant::now();
                    if let Some(open) = state.switches.iter_mut().rev().find(|s| s.ended.is_none()) {
                        open.ended = Some(now);
                    }
                }
                true
            }
            None => false,
        }
    }
}

/// Wraps a [`SimulatedWallet`] and answers `eth_getBalance` for one holder
/// only after `delay`, so concurrent runs get a chance to interleave
#[derive(Clone)]
pub struct SlowReads {
    inner: SimulatedWallet,
    holder: String,
    delay: Duration,
}

impl SlowReads {
    pub fn new(inner: SimulatedWallet, holder: &str, delay: Duration) -> Self {
        Self {
            inner,
            holder: holder.to_lowercase(),
            delay,
        }
    }
}

#[async_trait]
impl WalletProvider for SlowReads {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        let slow = method == METHOD_GET_BALANCE
            && params[0].as_str().map(str::to_lowercase).as_deref() == Some(self.holder.as_str());
        if slow {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.request(method, params).await
    }

    fn add_listener(&self, kind: WalletEventKind, sender: mpsc::UnboundedSender<WalletEvent>) -> ListenerId {
        self.inner.add_listener(kind, sender)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.remove_listener(id)
    }
}
