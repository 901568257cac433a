//! Ledger storage: balances, allowances, supply and the event log.
//!
//! The state root is the root of a Sparse Merkle Tree built over every
//! non-zero account and allowance leaf, so two states holding the same
//! balances and allowances always commit to the same root.

use crate::errors::LedgerError;
use crate::types::{AccountLeaf, Address, AllowanceLeaf, Balance, Event};
use sha2::{Digest, Sha256};
use sparse_merkle_tree::{
    default_store::DefaultStore, traits::Hasher, SparseMerkleTree as SMTree, H256,
};
use std::collections::BTreeMap;
use std::fmt;

/// SHA-256 hasher for the Sparse Merkle Tree.
#[derive(Default)]
pub struct Sha256Hasher(Sha256);

impl Hasher for Sha256Hasher {
    fn write_h256(&mut self, h: &H256) {
        self.0.update(h.as_slice());
    }

    fn write_byte(&mut self, b: u8) {
        self.0.update([b]);
    }

    fn finish(self) -> H256 {
        let result = self.0.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash.into()
    }
}

/// Tree key of an account balance.
fn account_key(addr: &Address) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"account::");
    hasher.update(addr);
    let result = hasher.finalize();
    let mut key = [0u8; 32];
    key.copy_from_slice(&result);
    key
}

/// Tree key of an (owner, spender) allowance.
fn allowance_key(owner: &Address, spender: &Address) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"allowance::");
    hasher.update(owner);
    hasher.update(spender);
    let result = hasher.finalize();
    let mut key = [0u8; 32];
    key.copy_from_slice(&result);
    key
}

/// A restore point for [`LedgerState`]. The event log only grows, so it is
/// recorded by length rather than copied.
#[derive(Clone, Debug)]
pub struct Snapshot {
    balances: BTreeMap<Address, Balance>,
    allowances: BTreeMap<(Address, Address), Balance>,
    total_supply: Balance,
    events_len: usize,
}

/// Balances, allowances and events of a single fungible token.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    balances: BTreeMap<Address, Balance>,
    allowances: BTreeMap<(Address, Address), Balance>,
    total_supply: Balance,
    events: Vec<Event>,
}

impl LedgerState {
    /// Creates an empty ledger state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of an account (zero for unknown accounts).
    pub fn balance(&self, addr: &Address) -> Balance {
        self.balances.get(addr).copied().unwrap_or(0)
    }

    /// Sets the balance of an account. Zero balances are removed.
    pub fn set_balance(&mut self, addr: Address, bal: Balance) {
        if bal == 0 {
            self.balances.remove(&addr);
        } else {
            self.balances.insert(addr, bal);
        }
    }

    /// Returns the allowance granted by `owner` to `spender`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Balance {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Sets an allowance. Zero allowances are removed.
    pub fn set_allowance(&mut self, owner: Address, spender: Address, amount: Balance) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    /// Returns the total supply.
    pub fn total_supply(&self) -> Balance {
        self.total_supply
    }

    /// Sets the total supply.
    pub fn set_total_supply(&mut self, supply: Balance) {
        self.total_supply = supply;
    }

    /// Appends an event to the log.
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Returns the event log in emission order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Captures a restore point.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            balances: self.balances.clone(),
            allowances: self.allowances.clone(),
            total_supply: self.total_supply,
            events_len: self.events.len(),
        }
    }

    /// Rolls back to `snapshot`, dropping every event emitted since.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.balances = snapshot.balances;
        self.allowances = snapshot.allowances;
        self.total_supply = snapshot.total_supply;
        self.events.truncate(snapshot.events_len);
    }

    /// Returns all non-zero accounts, ordered by address.
    pub fn accounts(&self) -> Vec<AccountLeaf> {
        self.balances
            .iter()
            .map(|(addr, bal)| AccountLeaf::new(*addr, *bal))
            .collect()
    }

    /// Returns all non-zero allowances, ordered by (owner, spender).
    pub fn allowances(&self) -> Vec<AllowanceLeaf> {
        self.allowances
            .iter()
            .map(|((owner, spender), amount)| AllowanceLeaf::new(*owner, *spender, *amount))
            .collect()
    }

    /// Computes the Sparse Merkle root over all account and allowance leaves.
    pub fn state_root(&self) -> Result<[u8; 32], LedgerError> {
        let mut tree: SMTree<Sha256Hasher, H256, DefaultStore<H256>> = SMTree::default();

        for leaf in self.accounts() {
            tree.update(H256::from(account_key(&leaf.addr)), H256::from(leaf.hash()))
                .map_err(|e| LedgerError::SMTError(e.to_string()))?;
        }

        for leaf in self.allowances() {
            tree.update(
                H256::from(allowance_key(&leaf.owner, &leaf.spender)),
                H256::from(leaf.hash()),
            )
            .map_err(|e| LedgerError::SMTError(e.to_string()))?;
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(tree.root().as_slice());
        Ok(root)
    }
}

impl fmt::Debug for LedgerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerState")
            .field("accounts", &self.balances.len())
            .field("allowances", &self.allowances.len())
            .field("total_supply", &self.total_supply)
            .field("events", &self.events.len())
            .finish()
    }
}
