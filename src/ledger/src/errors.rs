//! Error types for the ledger crate.

use crate::types::{Address, Balance, Selector};
use thiserror::Error;

/// Errors raised by the base ledger rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Error when trying to move more than the account holds.
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        /// The required balance
        required: Balance,
        /// The available balance
        available: Balance,
    },

    /// Error when a spender tries to move more than it was approved for.
    #[error("Insufficient allowance: required {required}, available {available}")]
    InsufficientAllowance {
        /// The required allowance
        required: Balance,
        /// The available allowance
        available: Balance,
    },

    /// Error when the sender is the zero address.
    #[error("Invalid sender: zero address")]
    InvalidSender,

    /// Error when the receiver is the zero address.
    #[error("Invalid receiver: zero address")]
    InvalidReceiver,

    /// Error when the approving owner is the zero address.
    #[error("Invalid approver: zero address")]
    InvalidApprover,

    /// Error when the spender is the zero address.
    #[error("Invalid spender: zero address")]
    InvalidSpender,

    /// Error when the token supply overflows.
    #[error("Token supply overflow")]
    SupplyOverflow,

    /// Error when an address cannot be parsed.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Error when token metadata cannot be parsed.
    #[error("Invalid token metadata: {0}")]
    InvalidMetadata(String),

    /// Error when an operation on the state tree fails.
    #[error("SMT error: {0}")]
    SMTError(String),

    /// Error when serialization or deserialization fails.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Error when a configuration file cannot be read or written.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A failure raised by contract code. Undoes the effects of the contract's frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Revert {
    /// The contract has no entry point for this selector.
    #[error("unknown selector 0x{}", hex::encode(.0))]
    UnknownSelector(Selector),

    /// The call data could not be decoded.
    #[error("malformed call data: {0}")]
    MalformedInput(String),

    /// A ledger rule failed inside the contract.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The contract reverted with a message.
    #[error("{0}")]
    Message(String),
}

/// Errors raised by the host when calling into contract code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// There is no code deployed at the target address.
    #[error("no code at 0x{}", hex::encode(.0))]
    NoCode(Address),

    /// The nested call depth limit was reached.
    #[error("call depth limit of {limit} exceeded")]
    DepthExceeded {
        /// The configured limit
        limit: usize,
    },

    /// The contract reverted.
    #[error("reverted: {0}")]
    Reverted(Revert),
}
