//! Configuration for a ledger host.

use crate::errors::LedgerError;
use crate::host::{Host, DEFAULT_MAX_CALL_DEPTH, MAX_SUPPORTED_CALL_DEPTH};
use crate::types::{resolve_account, Balance, TokenInfo};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// An initial balance credited when the host is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAllocation {
    /// Hex address or account label
    pub account: String,
    /// Amount minted to the account
    pub balance: Balance,
}

/// Configuration for a ledger host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Token metadata
    pub token: TokenInfo,
    /// Hex address or label of the token itself
    pub token_address: String,
    /// Maximum nested contract call depth
    pub max_call_depth: usize,
    /// Initial balances
    pub genesis: Vec<GenesisAllocation>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            token: TokenInfo::default(),
            token_address: "volt-token".to_string(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            genesis: Vec::new(),
        }
    }
}

impl LedgerConfig {
    /// Loads configuration from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let mut file = File::open(path)
            .map_err(|e| LedgerError::ConfigError(format!("{}: {}", path.display(), e)))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| LedgerError::ConfigError(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&contents).map_err(|e| LedgerError::ConfigError(e.to_string()))
    }

    /// Saves configuration to a file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), LedgerError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LedgerError::SerializationError(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| LedgerError::ConfigError(e.to_string()))
    }

    /// Builds a host and mints the genesis allocations.
    pub fn build_host(&self) -> Result<Host, LedgerError> {
        if self.max_call_depth > MAX_SUPPORTED_CALL_DEPTH {
            return Err(LedgerError::ConfigError(format!(
                "max_call_depth {} exceeds the supported maximum of {}",
                self.max_call_depth, MAX_SUPPORTED_CALL_DEPTH
            )));
        }

        let token_address = resolve_account(&self.token_address)?;
        let mut host = Host::new(token_address, self.token.clone())
            .with_max_call_depth(self.max_call_depth);

        for allocation in &self.genesis {
            let account = resolve_account(&allocation.account)?;
            host.token_mut().mint(&account, allocation.balance)?;
        }

        info!(
            "Built {} ledger with {} genesis accounts, supply {}",
            self.token.symbol,
            self.genesis.len(),
            host.token().total_supply()
        );
        Ok(host)
    }
}
