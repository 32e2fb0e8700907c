//! Domain layer - entities and repositories
//!
//! This module contains the domain model for multi-chain holdings: networks,
//! token holdings, accounts and the registry of supported chains.

pub mod entities;
pub mod repositories;

// Re-export domain components
pub use entities::*;
pub use repositories::*;
