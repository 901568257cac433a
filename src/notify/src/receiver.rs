//! The counterparty side of the protocol.
//!
//! A contract that wants to accept notified transfers or approvals answers the
//! matching callback with its confirmation token. The token doubles as the
//! callback's selector.

use ledger::call::{decode_call, split_selector};
use ledger::{Address, Balance, Contract, Host, Revert, Selector};
use serde::{Deserialize, Serialize};

/// Confirmation token (and selector) of the receipt callback.
pub const TRANSFER_RECEIVED: Selector = [0x88, 0xa7, 0xca, 0x5c];

/// Confirmation token (and selector) of the approval callback.
pub const APPROVAL_RECEIVED: Selector = [0x7b, 0x04, 0xa2, 0xd0];

/// Arguments of the receipt callback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// The account that initiated the transfer
    pub operator: Address,
    /// The account the funds came from
    pub from: Address,
    /// The amount received
    pub amount: Balance,
    /// Opaque payload chosen by the operator
    pub data: Vec<u8>,
}

/// Arguments of the approval callback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalReceipt {
    /// The owner that granted the allowance
    pub operator: Address,
    /// The allowance granted
    pub amount: Balance,
    /// Opaque payload chosen by the owner
    pub data: Vec<u8>,
}

/// Callbacks a counterparty may implement.
///
/// Both default to "not implemented", which the sender treats as a refusal.
/// While a callback runs, `host.current_caller()` is the token and
/// `host.address()` is the counterparty; the ledger already reflects the
/// transfer or approval being confirmed.
pub trait NotifyReceiver {
    /// Called after `receipt.amount` was credited to this contract.
    fn on_transfer_received(
        &self,
        host: &mut Host,
        receipt: TransferReceipt,
    ) -> Result<Selector, Revert> {
        let _ = (host, receipt);
        Err(Revert::UnknownSelector(TRANSFER_RECEIVED))
    }

    /// Called after this contract was granted an allowance of `receipt.amount`.
    fn on_approval_received(
        &self,
        host: &mut Host,
        receipt: ApprovalReceipt,
    ) -> Result<Selector, Revert> {
        let _ = (host, receipt);
        Err(Revert::UnknownSelector(APPROVAL_RECEIVED))
    }
}

/// Deploys a [`NotifyReceiver`] as contract code.
pub struct ReceiverContract<T> {
    inner: T,
}

impl<T: NotifyReceiver> ReceiverContract<T> {
    /// Wraps a receiver.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Returns the wrapped receiver.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: NotifyReceiver> Contract for ReceiverContract<T> {
    fn call(&self, host: &mut Host, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let (selector, _) = split_selector(input)?;
        let token = match selector {
            TRANSFER_RECEIVED => {
                let receipt: TransferReceipt = decode_call(input, TRANSFER_RECEIVED)?;
                self.inner.on_transfer_received(host, receipt)?
            }
            APPROVAL_RECEIVED => {
                let receipt: ApprovalReceipt = decode_call(input, APPROVAL_RECEIVED)?;
                self.inner.on_approval_received(host, receipt)?
            }
            other => return Err(Revert::UnknownSelector(other)),
        };
        Ok(token.to_vec())
    }
}
