//! Base fungible ledger rules.
//!
//! Every operation validates before it mutates, so a returned error always
//! leaves the state untouched.

use crate::errors::LedgerError;
use crate::state::LedgerState;
use crate::types::{Address, Balance, Event, InterfaceId, TokenInfo, ZERO_ADDRESS};
use tracing::debug;

/// Interface id of the introspection query itself.
pub const INTROSPECTION_INTERFACE_ID: InterfaceId = [0x01, 0xff, 0xc9, 0xa7];

/// Interface id of the base fungible ledger surface.
pub const LEDGER_INTERFACE_ID: InterfaceId = [0x36, 0x37, 0x2b, 0x07];

/// Reserved id that no contract may claim.
pub const INVALID_INTERFACE_ID: InterfaceId = [0xff, 0xff, 0xff, 0xff];

/// A fungible token: metadata plus its ledger state.
#[derive(Clone, Debug)]
pub struct Token {
    info: TokenInfo,
    state: LedgerState,
}

impl Token {
    /// Creates a token with an empty ledger.
    pub fn new(info: TokenInfo) -> Self {
        Self {
            info,
            state: LedgerState::new(),
        }
    }

    /// Returns the token metadata.
    pub fn info(&self) -> &TokenInfo {
        &self.info
    }

    /// Returns the underlying ledger state.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut LedgerState {
        &mut self.state
    }

    /// Returns the balance of an account.
    pub fn balance_of(&self, addr: &Address) -> Balance {
        self.state.balance(addr)
    }

    /// Returns the remaining allowance of `spender` over `owner`'s funds.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Balance {
        self.state.allowance(owner, spender)
    }

    /// Returns the total supply.
    pub fn total_supply(&self) -> Balance {
        self.state.total_supply()
    }

    /// Whether the base ledger itself implements `id`.
    pub fn supports_interface(&self, id: InterfaceId) -> bool {
        id == INTROSPECTION_INTERFACE_ID || id == LEDGER_INTERFACE_ID
    }

    /// Moves `amount` from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        if *from == ZERO_ADDRESS {
            return Err(LedgerError::InvalidSender);
        }
        if *to == ZERO_ADDRESS {
            return Err(LedgerError::InvalidReceiver);
        }
        self.move_balance(from, to, amount)
    }

    /// Sets the allowance of `spender` over `owner`'s funds to `amount`.
    pub fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        if *owner == ZERO_ADDRESS {
            return Err(LedgerError::InvalidApprover);
        }
        if *spender == ZERO_ADDRESS {
            return Err(LedgerError::InvalidSpender);
        }

        self.state.set_allowance(*owner, *spender, amount);
        self.state.emit(Event::Approval {
            owner: *owner,
            spender: *spender,
            amount,
        });
        debug!("approve: allowance set to {}", amount);
        Ok(())
    }

    /// Moves `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    ///
    /// An allowance of `Balance::MAX` is treated as unlimited and is not decremented.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        if *from == ZERO_ADDRESS {
            return Err(LedgerError::InvalidSender);
        }
        if *to == ZERO_ADDRESS {
            return Err(LedgerError::InvalidReceiver);
        }

        let allowance = self.state.allowance(from, spender);
        if allowance < amount {
            return Err(LedgerError::InsufficientAllowance {
                required: amount,
                available: allowance,
            });
        }

        let available = self.state.balance(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        if allowance != Balance::MAX {
            self.state.set_allowance(*from, *spender, allowance - amount);
        }
        self.move_balance(from, to, amount)
    }

    /// Creates `amount` new tokens in `to`'s account.
    pub fn mint(&mut self, to: &Address, amount: Balance) -> Result<(), LedgerError> {
        if *to == ZERO_ADDRESS {
            return Err(LedgerError::InvalidReceiver);
        }

        let supply = self
            .state
            .total_supply()
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow)?;
        // Cannot overflow: every balance is bounded by the supply.
        let bal = self.state.balance(to) + amount;

        self.state.set_total_supply(supply);
        self.state.set_balance(*to, bal);
        self.state.emit(Event::Transfer {
            from: ZERO_ADDRESS,
            to: *to,
            amount,
        });
        Ok(())
    }

    fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        let available = self.state.balance(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        self.state.set_balance(*from, available - amount);
        let receiver_bal = self.state.balance(to) + amount;
        self.state.set_balance(*to, receiver_bal);
        self.state.emit(Event::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        debug!("transfer: moved {}", amount);
        Ok(())
    }
}
