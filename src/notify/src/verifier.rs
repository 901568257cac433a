//! Callback verification.
//!
//! Plain accounts pass through untouched. Accounts with code must answer the
//! callback with the exact confirmation token; anything else rejects the
//! enclosing operation.

use crate::errors::{CallbackKind, NotifyError, RejectReason};
use crate::host::ContractHost;
use crate::receiver::{ApprovalReceipt, TransferReceipt, APPROVAL_RECEIVED, TRANSFER_RECEIVED};
use ledger::call::encode_call;
use ledger::types::short_address;
use ledger::{Address, Balance, CallError, Revert, Selector};
use serde::Serialize;
use tracing::{debug, warn};

/// Checks that `to` confirms receipt of `amount` sent from `from` by `operator`.
pub fn verify_receipt<H: ContractHost>(
    host: &mut H,
    operator: &Address,
    from: &Address,
    to: &Address,
    amount: Balance,
    data: &[u8],
) -> Result<(), NotifyError> {
    let receipt = TransferReceipt {
        operator: *operator,
        from: *from,
        amount,
        data: data.to_vec(),
    };
    invoke(host, CallbackKind::Receipt, to, TRANSFER_RECEIVED, &receipt)
}

/// Checks that `spender` confirms an allowance of `amount` granted by `operator`.
pub fn verify_approval<H: ContractHost>(
    host: &mut H,
    operator: &Address,
    spender: &Address,
    amount: Balance,
    data: &[u8],
) -> Result<(), NotifyError> {
    let receipt = ApprovalReceipt {
        operator: *operator,
        amount,
        data: data.to_vec(),
    };
    invoke(host, CallbackKind::Approval, spender, APPROVAL_RECEIVED, &receipt)
}

fn invoke<H: ContractHost, T: Serialize>(
    host: &mut H,
    kind: CallbackKind,
    counterparty: &Address,
    expected: Selector,
    args: &T,
) -> Result<(), NotifyError> {
    if !host.has_code(counterparty) {
        debug!(
            "{} is a plain account, skipping {} callback",
            short_address(counterparty),
            kind
        );
        return Ok(());
    }

    let reject = |reason: RejectReason| {
        warn!(
            "{} callback rejected by {}: {}",
            kind,
            short_address(counterparty),
            reason
        );
        NotifyError::CallbackRejected {
            kind,
            counterparty: *counterparty,
            reason,
        }
    };

    let input = encode_call(expected, args)
        .map_err(|e| reject(RejectReason::EncodingFailed(e.to_string())))?;

    match host.call(counterparty, &input) {
        Ok(output) if output[..] == expected[..] => {
            debug!("{} confirmed {} callback", short_address(counterparty), kind);
            Ok(())
        }
        Ok(output) => Err(reject(RejectReason::UnexpectedReturn(output))),
        Err(CallError::Reverted(Revert::UnknownSelector(_))) | Err(CallError::NoCode(_)) => {
            Err(reject(RejectReason::NotImplemented))
        }
        Err(CallError::Reverted(revert)) => Err(reject(RejectReason::Reverted(revert.to_string()))),
        Err(CallError::DepthExceeded { .. }) => Err(reject(RejectReason::DepthExceeded)),
    }
}
