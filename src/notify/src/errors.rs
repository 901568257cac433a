//! Error types for the notify crate.

use ledger::types::short_address;
use ledger::{Address, Balance};
use std::fmt;
use thiserror::Error;

/// Which callback a counterparty was asked to confirm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    /// Confirmation of received funds.
    Receipt,
    /// Confirmation of a granted allowance.
    Approval,
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackKind::Receipt => write!(f, "receipt"),
            CallbackKind::Approval => write!(f, "approval"),
        }
    }
}

/// Why a counterparty's callback did not confirm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// The callback returned something other than the expected confirmation token.
    UnexpectedReturn(Vec<u8>),
    /// The callback reverted.
    Reverted(String),
    /// The counterparty has code but no entry point for the callback.
    NotImplemented,
    /// The callback could not be entered because the call stack is full.
    DepthExceeded,
    /// The callback arguments could not be encoded; the counterparty was never called.
    EncodingFailed(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnexpectedReturn(data) => {
                write!(f, "returned 0x{}", hex::encode(data))
            }
            RejectReason::Reverted(msg) => write!(f, "reverted: {}", msg),
            RejectReason::NotImplemented => write!(f, "callback not implemented"),
            RejectReason::DepthExceeded => write!(f, "call depth exceeded"),
            RejectReason::EncodingFailed(msg) => write!(f, "call data not encoded: {}", msg),
        }
    }
}

/// Errors that abort a notify operation. The operation leaves no effects behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The base ledger rejected the transfer.
    #[error("Transfer of {amount} to {} failed", short_address(.receiver))]
    TransferFailed {
        /// The intended receiver
        receiver: Address,
        /// The amount
        amount: Balance,
    },

    /// The base ledger rejected the delegated transfer.
    #[error("Transfer of {amount} from {} to {} failed", short_address(.sender), short_address(.receiver))]
    TransferFromFailed {
        /// The account funds were taken from
        sender: Address,
        /// The intended receiver
        receiver: Address,
        /// The amount
        amount: Balance,
    },

    /// The base ledger rejected the approval.
    #[error("Approval of {amount} for {} failed", short_address(.spender))]
    ApproveFailed {
        /// The intended spender
        spender: Address,
        /// The amount
        amount: Balance,
    },

    /// The counterparty did not confirm the notification.
    #[error("{kind} callback rejected by {}: {reason}", short_address(.counterparty))]
    CallbackRejected {
        /// The callback that was invoked
        kind: CallbackKind,
        /// The receiver or spender
        counterparty: Address,
        /// What went wrong
        reason: RejectReason,
    },
}

impl NotifyError {
    /// Whether the failure came from the base ledger rather than the counterparty.
    pub fn is_ledger_failure(&self) -> bool {
        !matches!(self, NotifyError::CallbackRejected { .. })
    }
}
