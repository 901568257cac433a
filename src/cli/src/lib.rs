//! Scenario runner for the transfer-and-notify ledger.

pub mod commands;
pub mod contracts;
pub mod errors;
pub mod scenario;

// Re-export commonly used types and functions
pub use commands::{init, run, supports, tokens};
pub use contracts::{Behavior, BehaviorSpec, ScriptedReceiver};
pub use errors::CliError;
pub use scenario::{ContractSpec, Expectation, Operation, Scenario, Step};
