//! Collaborator contracts: what the notify operations need from the ledger
//! and from the execution environment, and their binding to [`ledger::Host`].

use ledger::types::short_address;
use ledger::{Address, Balance, CallError, InterfaceId};
use tracing::debug;

/// The base ledger surface the notify operations are layered on.
///
/// Every mutating call must either succeed completely or report `false`
/// with no effects.
pub trait Ledger {
    /// The account on whose behalf the current operation runs.
    fn current_caller(&self) -> Address;

    /// Moves `amount` from the current caller to `to`.
    fn transfer(&mut self, to: &Address, amount: Balance) -> bool;

    /// Moves `amount` from `from` to `to` using the current caller's allowance.
    fn transfer_from(&mut self, from: &Address, to: &Address, amount: Balance) -> bool;

    /// Sets the allowance of `spender` over the current caller's funds.
    fn approve(&mut self, spender: &Address, amount: Balance) -> bool;

    /// Capabilities implemented by the base ledger itself.
    fn supports_interface(&self, id: InterfaceId) -> bool;
}

/// The execution environment: code lookup, synchronous calls and atomicity.
pub trait ContractHost {
    /// Whether executable code is associated with `address`.
    fn has_code(&self, address: &Address) -> bool;

    /// Synchronously calls the code at `target` and returns its raw output.
    fn call(&mut self, target: &Address, input: &[u8]) -> Result<Vec<u8>, CallError>;

    /// Runs `f` so that an `Err` leaves no observable effects.
    fn atomic<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>;
}

impl Ledger for ledger::Host {
    fn current_caller(&self) -> Address {
        ledger::Host::current_caller(self)
    }

    fn transfer(&mut self, to: &Address, amount: Balance) -> bool {
        match ledger::Host::transfer(self, to, amount) {
            Ok(()) => true,
            Err(e) => {
                debug!("Ledger rejected transfer to {}: {}", short_address(to), e);
                false
            }
        }
    }

    fn transfer_from(&mut self, from: &Address, to: &Address, amount: Balance) -> bool {
        match ledger::Host::transfer_from(self, from, to, amount) {
            Ok(()) => true,
            Err(e) => {
                debug!(
                    "Ledger rejected transfer from {} to {}: {}",
                    short_address(from),
                    short_address(to),
                    e
                );
                false
            }
        }
    }

    fn approve(&mut self, spender: &Address, amount: Balance) -> bool {
        match ledger::Host::approve(self, spender, amount) {
            Ok(()) => true,
            Err(e) => {
                debug!("Ledger rejected approval for {}: {}", short_address(spender), e);
                false
            }
        }
    }

    fn supports_interface(&self, id: InterfaceId) -> bool {
        self.token().supports_interface(id)
    }
}

impl ContractHost for ledger::Host {
    fn has_code(&self, address: &Address) -> bool {
        ledger::Host::has_code(self, address)
    }

    fn call(&mut self, target: &Address, input: &[u8]) -> Result<Vec<u8>, CallError> {
        ledger::Host::call(self, target, input)
    }

    fn atomic<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        ledger::Host::atomic(self, f)
    }
}
