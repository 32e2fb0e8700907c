//! Infrastructure layer - wallet boundary and configuration
//!
//! This module contains the adapter to the injected wallet provider, the
//! host environment probe and configuration loading.

pub mod provider;
pub mod environment;
pub mod config;

// Re-export infrastructure components
pub use provider::*;
pub use environment::*;
pub use config::*;
