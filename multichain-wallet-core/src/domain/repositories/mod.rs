//! Domain repositories
//!
//! Read-only sources of domain data.

pub mod chain_registry;

// Re-export repositories
pub use chain_registry::*;
