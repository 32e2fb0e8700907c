//! Aggregator configuration
//!
//! Timings for the switch/read loop. Defaults match the wallet prompts'
//! reference pacing; `.env` or process environment may override them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    DEFAULT_NETWORK_DELAY_MS, DEFAULT_SWITCH_TIMEOUT_MS, ENV_NETWORK_DELAY_MS, ENV_SWITCH_TIMEOUT_MS,
};
use crate::shared::error::WalletError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Upper bound on waiting for the wallet to confirm a network switch
    pub switch_timeout: Duration,
    /// Pause between consecutive networks of one aggregation run
    pub inter_network_delay: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            switch_timeout: Duration::from_millis(DEFAULT_SWITCH_TIMEOUT_MS),
            inter_network_delay: Duration::from_millis(DEFAULT_NETWORK_DELAY_MS),
        }
    }
}

impl AggregatorConfig {
    /// Load from `.env` if present, then the process environment
    pub fn from_env() -> Result<Self, WalletError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, WalletError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            switch_timeout: read_millis(&lookup, ENV_SWITCH_TIMEOUT_MS)?.unwrap_or(defaults.switch_timeout),
            inter_network_delay: read_millis(&lookup, ENV_NETWORK_DELAY_MS)?
                .unwrap_or(defaults.inter_network_delay),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), WalletError> {
        if self.switch_timeout.is_zero() {
            return Err(WalletError::config("Switch timeout must be greater than zero"));
        }
        Ok(())
    }

    pub fn with_switch_timeout(mut self, timeout: Duration) -> Self {
        self.switch_timeout = timeout;
        self
    }

    pub fn with_inter_network_delay(mut self, delay: Duration) -> Self {
        self.inter_network_delay = delay;
        self
    }
}

fn read_millis<F>(lookup: &F, key: &str) -> Result<Option<Duration>, WalletError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|e| WalletError::config(format!("Invalid value for {}: {:?} ({})", key, raw, e))),
    }
}
