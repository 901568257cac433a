//! Transfer-and-notify extension for the Volt fungible ledger.
//!
//! A notify operation moves value (or grants an allowance) and, in the same
//! atomic frame, requires the counterparty to confirm by returning a fixed
//! 4-byte token from a callback. Plain accounts without code are not asked.
//! If a counterparty with code does not confirm, the whole operation is undone.

pub mod capability;
pub mod errors;
pub mod host;
pub mod receiver;
pub mod token;
pub mod verifier;

// Re-export commonly used types
pub use capability::{CapabilityRegistry, NOTIFY_INTERFACE_ID};
pub use errors::{CallbackKind, NotifyError, RejectReason};
pub use host::{ContractHost, Ledger};
pub use receiver::{
    ApprovalReceipt, NotifyReceiver, ReceiverContract, TransferReceipt, APPROVAL_RECEIVED,
    TRANSFER_RECEIVED,
};
pub use token::NotifyToken;
pub use verifier::{verify_approval, verify_receipt};
