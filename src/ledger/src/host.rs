//! Execution host: caller frames, deployed contract code and atomic frames.
//!
//! The host is the transactional environment the ledger runs in. Every frame
//! entered through [`Host::execute`] or [`Host::call`] is atomic: if it returns
//! an error, all ledger effects made inside it are undone. Frames nest, so a
//! failing inner frame only undoes its own effects.

use crate::errors::{CallError, LedgerError, Revert};
use crate::token::Token;
use crate::types::{short_address, Address, Balance, TokenInfo, ZERO_ADDRESS};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Default limit on nested frames. Every reentrant callback level takes two
/// (the contract frame and the frame it enters the token with).
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

/// Highest frame limit a configuration may ask for. Deeper nesting exhausts
/// a 2 MiB thread stack before the limit can fire.
pub const MAX_SUPPORTED_CALL_DEPTH: usize = 256;

/// Code deployed at an address.
///
/// `input` is a 4-byte selector followed by the encoded arguments (see
/// [`crate::call`]). While the contract runs, [`Host::address`] is the
/// contract's own address and [`Host::current_caller`] is whoever called it.
/// To act on the ledger as itself, a contract enters a new frame with
/// `host.execute(host.address(), ...)`.
pub trait Contract {
    /// Handles a call. An `Err` reverts everything the contract did.
    fn call(&self, host: &mut Host, input: &[u8]) -> Result<Vec<u8>, Revert>;
}

/// A single entry on the call stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Frame {
    caller: Address,
    address: Address,
}

/// The execution environment for a single token ledger.
pub struct Host {
    token: Token,
    token_address: Address,
    code: HashMap<Address, Arc<dyn Contract>>,
    frames: Vec<Frame>,
    max_call_depth: usize,
}

impl Host {
    /// Creates a host for a token deployed at `token_address`.
    pub fn new(token_address: Address, info: TokenInfo) -> Self {
        Self {
            token: Token::new(info),
            token_address,
            code: HashMap::new(),
            frames: Vec::new(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Sets the nested call depth limit.
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    /// Returns the address the token lives at.
    pub fn token_address(&self) -> Address {
        self.token_address
    }

    /// Returns the token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Returns the token for direct mutation (genesis, administration).
    ///
    /// Changes made here bypass caller frames but are still undone if made
    /// inside a failing atomic frame.
    pub fn token_mut(&mut self) -> &mut Token {
        &mut self.token
    }

    /// Shorthand for `token().balance_of(addr)`.
    pub fn balance_of(&self, addr: &Address) -> Balance {
        self.token.balance_of(addr)
    }

    /// Shorthand for the state root of the token ledger.
    pub fn state_root(&self) -> Result<[u8; 32], LedgerError> {
        self.token.state().state_root()
    }

    /// Deploys contract code at `address`, replacing any previous code.
    pub fn deploy(&mut self, address: Address, contract: Arc<dyn Contract>) {
        debug!("Deploying contract at {}", short_address(&address));
        self.code.insert(address, contract);
    }

    /// Whether any code is deployed at `address`.
    pub fn has_code(&self, address: &Address) -> bool {
        self.code.contains_key(address)
    }

    /// The caller of the innermost frame, or the zero address outside any frame.
    pub fn current_caller(&self) -> Address {
        self.frames.last().map(|f| f.caller).unwrap_or(ZERO_ADDRESS)
    }

    /// The account executing the innermost frame, or the zero address outside any frame.
    pub fn address(&self) -> Address {
        self.frames.last().map(|f| f.address).unwrap_or(ZERO_ADDRESS)
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Runs `f` as a call from `caller` into the token, atomically.
    pub fn execute<T, E, F>(&mut self, caller: Address, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Host) -> Result<T, E>,
    {
        self.frames.push(Frame {
            caller,
            address: self.token_address,
        });
        let result = self.atomic(f);
        self.frames.pop();
        result
    }

    /// Runs `f`, restoring the ledger state if it fails.
    pub fn atomic<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Host) -> Result<T, E>,
    {
        let snapshot = self.token.state().snapshot();
        let result = f(self);
        if result.is_err() {
            trace!("Frame at depth {} failed, restoring state", self.frames.len());
            self.token.state_mut().restore(snapshot);
        }
        result
    }

    /// Synchronously calls the contract deployed at `target`.
    pub fn call(&mut self, target: &Address, input: &[u8]) -> Result<Vec<u8>, CallError> {
        let code = self
            .code
            .get(target)
            .cloned()
            .ok_or(CallError::NoCode(*target))?;

        if self.frames.len() >= self.max_call_depth {
            return Err(CallError::DepthExceeded {
                limit: self.max_call_depth,
            });
        }

        let caller = self.address();
        trace!(
            "Calling {} from {} at depth {}",
            short_address(target),
            short_address(&caller),
            self.frames.len()
        );

        self.frames.push(Frame {
            caller,
            address: *target,
        });
        let result = self.atomic(|host| code.call(host, input));
        self.frames.pop();

        result.map_err(CallError::Reverted)
    }

    /// Transfers `amount` from the current caller to `to`.
    pub fn transfer(&mut self, to: &Address, amount: Balance) -> Result<(), LedgerError> {
        let caller = self.current_caller();
        self.token.transfer(&caller, to, amount)
    }

    /// Transfers `amount` from `from` to `to`, spending the current caller's allowance.
    pub fn transfer_from(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Balance,
    ) -> Result<(), LedgerError> {
        let caller = self.current_caller();
        self.token.transfer_from(&caller, from, to, amount)
    }

    /// Sets the allowance of `spender` over the current caller's funds.
    pub fn approve(&mut self, spender: &Address, amount: Balance) -> Result<(), LedgerError> {
        let caller = self.current_caller();
        self.token.approve(&caller, spender, amount)
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("token_address", &short_address(&self.token_address))
            .field("token", &self.token)
            .field("contracts", &self.code.len())
            .field("depth", &self.frames.len())
            .finish()
    }
}
