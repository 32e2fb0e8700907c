//! Domain entities and value objects
//!
//! This module contains the core domain entities and value objects
//! that represent networks, holdings and accounts.

pub mod network;
pub mod token;
pub mod account;

// Re-export entities
pub use network::*;
pub use token::*;
pub use account::*;
