//! Core types for the Volt fungible ledger.

use crate::errors::LedgerError;
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// A 32-byte address, typically derived from a public key or a label.
pub type Address = [u8; 32];

/// Token balance, represented as a 128-bit unsigned integer.
pub type Balance = u128;

/// A 4-byte function selector, also used as a callback confirmation token.
pub type Selector = [u8; 4];

/// A 4-byte interface identifier used for capability discovery.
pub type InterfaceId = [u8; 4];

/// The zero address. Never a valid sender, receiver, owner or spender.
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// Derives an address from a human readable label (SHA-256 of the label).
pub fn address_from_label(label: &str) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(label.as_bytes());
    let result = hasher.finalize();
    let mut addr = [0u8; 32];
    addr.copy_from_slice(&result);
    addr
}

/// Parses a hex encoded address, with or without a `0x` prefix.
pub fn parse_address(s: &str) -> Result<Address, LedgerError> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(trimmed)
        .map_err(|e| LedgerError::InvalidAddress(format!("{}: {}", s, e)))?;
    if bytes.len() != 32 {
        return Err(LedgerError::InvalidAddress(format!(
            "{}: expected 32 bytes, got {}",
            s,
            bytes.len()
        )));
    }
    let mut addr = [0u8; 32];
    addr.copy_from_slice(&bytes);
    Ok(addr)
}

/// Resolves an account reference: a 64 digit hex address or a label.
pub fn resolve_account(s: &str) -> Result<Address, LedgerError> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    if trimmed.len() == 64 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        parse_address(trimmed)
    } else if s.is_empty() {
        Err(LedgerError::InvalidAddress("empty account reference".to_string()))
    } else {
        Ok(address_from_label(s))
    }
}

/// Formats an address as `0x` followed by 64 hex digits.
pub fn format_address(addr: &Address) -> String {
    format!("0x{}", hex::encode(addr))
}

/// Short form of an address for log lines.
pub fn short_address(addr: &Address) -> String {
    format!("0x{}..", hex::encode(&addr[..4]))
}

/// Token metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Human readable name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Number of decimals used for display
    pub decimals: u8,
}

impl Default for TokenInfo {
    fn default() -> Self {
        Self {
            name: "Volt Token".to_string(),
            symbol: "VOLT".to_string(),
            decimals: 18,
        }
    }
}

impl FromStr for TokenInfo {
    type Err = LedgerError;

    /// Parses the compact `SYMBOL|Name|decimals` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('|').collect();
        if parts.len() != 3 {
            return Err(LedgerError::InvalidMetadata(s.to_string()));
        }
        let decimals = parts[2]
            .trim()
            .parse::<u8>()
            .map_err(|_| LedgerError::InvalidMetadata(s.to_string()))?;
        Ok(Self {
            symbol: parts[0].trim().to_string(),
            name: parts[1].trim().to_string(),
            decimals,
        })
    }
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.symbol, self.name, self.decimals)
    }
}

/// An account balance leaf in the state tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLeaf {
    /// The account address
    pub addr: Address,
    /// The account balance
    pub bal: Balance,
}

impl AccountLeaf {
    /// Creates a new account leaf.
    pub fn new(addr: Address, bal: Balance) -> Self {
        Self { addr, bal }
    }

    /// Computes the hash of this account leaf.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"account");
        hasher.update(self.addr);

        let mut bal_bytes = [0u8; 16];
        LittleEndian::write_u128(&mut bal_bytes, self.bal);
        hasher.update(bal_bytes);

        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}

/// An allowance leaf in the state tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceLeaf {
    /// The owner of the funds
    pub owner: Address,
    /// The account allowed to spend them
    pub spender: Address,
    /// The remaining allowance
    pub amount: Balance,
}

impl AllowanceLeaf {
    /// Creates a new allowance leaf.
    pub fn new(owner: Address, spender: Address, amount: Balance) -> Self {
        Self { owner, spender, amount }
    }

    /// Computes the hash of this allowance leaf.
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"allowance");
        hasher.update(self.owner);
        hasher.update(self.spender);

        let mut amount_bytes = [0u8; 16];
        LittleEndian::write_u128(&mut amount_bytes, self.amount);
        hasher.update(amount_bytes);

        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }
}

/// Ledger events, recorded in execution order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Value moved between two accounts (zero `from` for mints).
    Transfer {
        /// The sender's address
        from: Address,
        /// The recipient's address
        to: Address,
        /// The amount moved
        amount: Balance,
    },

    /// An allowance was set.
    Approval {
        /// The owner's address
        owner: Address,
        /// The spender's address
        spender: Address,
        /// The new allowance
        amount: Balance,
    },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Transfer { from, to, amount } => {
                write!(
                    f,
                    "Transfer {{ from: {}, to: {}, amount: {} }}",
                    short_address(from),
                    short_address(to),
                    amount
                )
            }
            Event::Approval { owner, spender, amount } => {
                write!(
                    f,
                    "Approval {{ owner: {}, spender: {}, amount: {} }}",
                    short_address(owner),
                    short_address(spender),
                    amount
                )
            }
        }
    }
}
