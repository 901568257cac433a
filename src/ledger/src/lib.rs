//! Fungible ledger and execution host for the Volt notify extension.
//!
//! This crate provides the base token rules (balances, allowances, supply),
//! a Sparse Merkle commitment over the ledger state, and the [`Host`] that
//! runs ledger operations and contract code inside atomic frames.

pub mod call;
pub mod config;
pub mod errors;
pub mod host;
pub mod state;
pub mod token;
pub mod types;

// Re-export commonly used types
pub use config::{GenesisAllocation, LedgerConfig};
pub use errors::{CallError, LedgerError, Revert};
pub use host::{Contract, Host};
pub use state::{LedgerState, Snapshot};
pub use token::Token;
pub use types::{Address, Balance, Event, InterfaceId, Selector, TokenInfo, ZERO_ADDRESS};
