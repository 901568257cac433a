//! Scripted counterparties for scenarios.

use crate::errors::CliError;
use ledger::types::resolve_account;
use ledger::{Address, Host, Revert, Selector};
use notify::{
    ApprovalReceipt, NotifyReceiver, TransferReceipt, APPROVAL_RECEIVED, TRANSFER_RECEIVED,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a scripted counterparty answers callbacks, as written in a scenario file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorSpec {
    /// Confirm every callback with the right token.
    Accept,
    /// Answer every callback with this 4-byte hex token.
    Return {
        /// Hex encoded token, e.g. `0x88a7ca5c`
        token: String,
    },
    /// Revert every callback with a message.
    Revert {
        /// Revert message
        message: String,
    },
    /// Deployed code that implements neither callback.
    Ignore,
    /// Pass received funds on to another account, then confirm.
    Forward {
        /// Hex address or label of the destination
        to: String,
    },
    /// Confirm only if the transfer or allowance is already visible on the ledger.
    CheckBalance,
}

/// Resolved behavior of a scripted counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Confirm with the right token.
    Accept,
    /// Answer with this token.
    Return(Selector),
    /// Revert with the receiver's message.
    Revert,
    /// Refuse as if the callback did not exist.
    Ignore,
    /// Send received funds on to this account, then confirm.
    Forward(Address),
    /// Confirm only if the ledger already shows the transfer or allowance.
    CheckBalance,
}

/// Parses a 4-byte hex token, with or without a `0x` prefix.
pub fn parse_selector(s: &str) -> Result<Selector, CliError> {
    let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))
        .map_err(|e| CliError::InvalidInput(format!("{}: {}", s, e)))?;
    if bytes.len() != 4 {
        return Err(CliError::InvalidInput(format!(
            "{}: expected 4 bytes, got {}",
            s,
            bytes.len()
        )));
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&bytes);
    Ok(selector)
}

/// A counterparty whose answers are fixed by the scenario.
#[derive(Debug, Clone)]
pub struct ScriptedReceiver {
    behavior: Behavior,
    message: String,
}

impl ScriptedReceiver {
    /// Creates a receiver with the given behavior.
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            message: "rejected by scenario".to_string(),
        }
    }

    /// Resolves a behavior from its scenario description.
    pub fn from_spec(spec: &BehaviorSpec) -> Result<Self, CliError> {
        let receiver = match spec {
            BehaviorSpec::Accept => Self::new(Behavior::Accept),
            BehaviorSpec::Return { token } => Self::new(Behavior::Return(parse_selector(token)?)),
            BehaviorSpec::Revert { message } => Self {
                behavior: Behavior::Revert,
                message: message.clone(),
            },
            BehaviorSpec::Ignore => Self::new(Behavior::Ignore),
            BehaviorSpec::Forward { to } => Self::new(Behavior::Forward(resolve_account(to)?)),
            BehaviorSpec::CheckBalance => Self::new(Behavior::CheckBalance),
        };
        Ok(receiver)
    }

    /// Returns the resolved behavior.
    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    fn answer(&self, confirmation: Selector) -> Result<Selector, Revert> {
        match self.behavior {
            Behavior::Return(token) => Ok(token),
            Behavior::Revert => Err(Revert::Message(self.message.clone())),
            Behavior::Ignore => Err(Revert::UnknownSelector(confirmation)),
            Behavior::Accept | Behavior::Forward(_) | Behavior::CheckBalance => Ok(confirmation),
        }
    }
}

impl NotifyReceiver for ScriptedReceiver {
    fn on_transfer_received(
        &self,
        host: &mut Host,
        receipt: TransferReceipt,
    ) -> Result<Selector, Revert> {
        let me = host.address();
        match self.behavior {
            Behavior::Forward(to) => {
                debug!("Forwarding {} received tokens", receipt.amount);
                host.execute(me, |h| h.transfer(&to, receipt.amount))?;
            }
            Behavior::CheckBalance => {
                if host.balance_of(&me) < receipt.amount {
                    return Err(Revert::Message("received funds not visible".to_string()));
                }
            }
            _ => {}
        }
        self.answer(TRANSFER_RECEIVED)
    }

    fn on_approval_received(
        &self,
        host: &mut Host,
        receipt: ApprovalReceipt,
    ) -> Result<Selector, Revert> {
        if self.behavior == Behavior::CheckBalance {
            let me = host.address();
            if host.token().allowance(&receipt.operator, &me) != receipt.amount {
                return Err(Revert::Message("allowance not visible".to_string()));
            }
        }
        self.answer(APPROVAL_RECEIVED)
    }
}
