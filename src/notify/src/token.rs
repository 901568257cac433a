//! Notify operations: a ledger operation and its confirmation as one atomic unit.
//!
//! Each entry point runs the base ledger operation first and, only if it
//! succeeded, asks the counterparty to confirm. Both steps run inside a single
//! atomic frame, so the callback already observes the moved funds or granted
//! allowance, and any failure leaves the ledger exactly as it was.

use crate::capability::CapabilityRegistry;
use crate::errors::NotifyError;
use crate::host::{ContractHost, Ledger};
use crate::verifier::{verify_approval, verify_receipt};
use ledger::types::short_address;
use ledger::{Address, Balance, InterfaceId};
use tracing::info;

/// The transfer-and-notify extension of a fungible ledger.
#[derive(Clone, Debug, Default)]
pub struct NotifyToken {
    capabilities: CapabilityRegistry,
}

impl NotifyToken {
    /// Creates the extension with its fixed capability chain.
    pub fn new() -> Self {
        Self {
            capabilities: CapabilityRegistry::new(),
        }
    }

    /// Whether the token supports the interface `id`.
    pub fn supports<H: Ledger>(&self, host: &H, id: InterfaceId) -> bool {
        self.capabilities.supports(host, id)
    }

    /// Transfers `amount` to `to` and requires `to` to confirm receipt.
    pub fn transfer_and_notify<H>(
        &self,
        host: &mut H,
        to: &Address,
        amount: Balance,
    ) -> Result<(), NotifyError>
    where
        H: Ledger + ContractHost,
    {
        self.transfer_and_notify_with_data(host, to, amount, &[])
    }

    /// Transfers `amount` to `to` and requires `to` to confirm receipt of `data`.
    pub fn transfer_and_notify_with_data<H>(
        &self,
        host: &mut H,
        to: &Address,
        amount: Balance,
        data: &[u8],
    ) -> Result<(), NotifyError>
    where
        H: Ledger + ContractHost,
    {
        host.atomic(|host| {
            let caller = host.current_caller();
            if !host.transfer(to, amount) {
                return Err(NotifyError::TransferFailed {
                    receiver: *to,
                    amount,
                });
            }
            verify_receipt(host, &caller, &caller, to, amount, data)?;
            info!(
                "{} sent {} to {} with notification",
                short_address(&caller),
                amount,
                short_address(to)
            );
            Ok(())
        })
    }

    /// Transfers `amount` from `from` to `to` with the caller's allowance and
    /// requires `to` to confirm receipt.
    pub fn transfer_from_and_notify<H>(
        &self,
        host: &mut H,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), NotifyError>
    where
        H: Ledger + ContractHost,
    {
        self.transfer_from_and_notify_with_data(host, from, to, amount, &[])
    }

    /// Like [`NotifyToken::transfer_from_and_notify`], passing `data` to the receiver.
    pub fn transfer_from_and_notify_with_data<H>(
        &self,
        host: &mut H,
        from: &Address,
        to: &Address,
        amount: Balance,
        data: &[u8],
    ) -> Result<(), NotifyError>
    where
        H: Ledger + ContractHost,
    {
        host.atomic(|host| {
            let caller = host.current_caller();
            if !host.transfer_from(from, to, amount) {
                return Err(NotifyError::TransferFromFailed {
                    sender: *from,
                    receiver: *to,
                    amount,
                });
            }
            verify_receipt(host, &caller, from, to, amount, data)?;
            info!(
                "{} moved {} from {} to {} with notification",
                short_address(&caller),
                amount,
                short_address(from),
                short_address(to)
            );
            Ok(())
        })
    }

    /// Approves `spender` for `amount` and requires `spender` to confirm.
    pub fn approve_and_notify<H>(
        &self,
        host: &mut H,
        spender: &Address,
        amount: Balance,
    ) -> Result<(), NotifyError>
    where
        H: Ledger + ContractHost,
    {
        self.approve_and_notify_with_data(host, spender, amount, &[])
    }

    /// Like [`NotifyToken::approve_and_notify`], passing `data` to the spender.
    pub fn approve_and_notify_with_data<H>(
        &self,
        host: &mut H,
        spender: &Address,
        amount: Balance,
        data: &[u8],
    ) -> Result<(), NotifyError>
    where
        H: Ledger + ContractHost,
    {
        host.atomic(|host| {
            let caller = host.current_caller();
            if !host.approve(spender, amount) {
                return Err(NotifyError::ApproveFailed {
                    spender: *spender,
                    amount,
                });
            }
            verify_approval(host, &caller, spender, amount, data)?;
            info!(
                "{} approved {} for {} with notification",
                short_address(&caller),
                amount,
                short_address(spender)
            );
            Ok(())
        })
    }
}
