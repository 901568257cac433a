//! Tokens command: lists the fixed identifiers a counterparty must know.

use ledger::token::{INTROSPECTION_INTERFACE_ID, LEDGER_INTERFACE_ID};
use notify::{APPROVAL_RECEIVED, NOTIFY_INTERFACE_ID, TRANSFER_RECEIVED};

/// Runs the tokens command.
pub fn run() -> Vec<(&'static str, [u8; 4])> {
    vec![
        ("transfer received", TRANSFER_RECEIVED),
        ("approval received", APPROVAL_RECEIVED),
        ("notify interface", NOTIFY_INTERFACE_ID),
        ("ledger interface", LEDGER_INTERFACE_ID),
        ("introspection interface", INTROSPECTION_INTERFACE_ID),
    ]
}
