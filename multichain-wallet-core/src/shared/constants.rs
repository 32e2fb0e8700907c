//! Constants for the wallet core
//!
//! This module contains all constants used throughout the wallet core.

// EIP-1193 provider error codes
pub const CODE_USER_REJECTED: i64 = 4001;
pub const CODE_UNAUTHORIZED: i64 = 4100;
pub const CODE_UNSUPPORTED_METHOD: i64 = 4200;
pub const CODE_DISCONNECTED: i64 = 4900;
pub const CODE_CHAIN_DISCONNECTED: i64 = 4901;
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;

// Wallet RPC methods
pub const METHOD_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
pub const METHOD_CHAIN_ID: &str = "eth_chainId";
pub const METHOD_SWITCH_CHAIN: &str = "wallet_switchEthereumChain";
pub const METHOD_ADD_CHAIN: &str = "wallet_addEthereumChain";
pub const METHOD_GET_BALANCE: &str = "eth_getBalance";
pub const METHOD_CALL: &str = "eth_call";
pub const BLOCK_TAG_LATEST: &str = "latest";

// ERC-20 read-only interface
pub const ERC20_BALANCE_OF: &str = "balanceOf(address)";
pub const ERC20_DECIMALS: &str = "decimals()";
pub const ERC20_SYMBOL: &str = "symbol()";

// Timing
pub const DEFAULT_SWITCH_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_NETWORK_DELAY_MS: u64 = 500;

// Environment keys
pub const ENV_SWITCH_TIMEOUT_MS: &str = "WALLET_CORE_SWITCH_TIMEOUT_MS";
pub const ENV_NETWORK_DELAY_MS: &str = "WALLET_CORE_NETWORK_DELAY_MS";
pub const ENV_RPC_PREFIX: &str = "WALLET_CORE_RPC_";

// U256 can hold 10^77 but not 10^78
pub const MAX_DECIMALS: u32 = 77;

// Validation constants
pub const ADDRESS_LENGTH: usize = 42; // 0x + 40 hex chars

pub const LOG_LEVEL: &str = if cfg!(debug_assertions) { "debug" } else { "info" };
