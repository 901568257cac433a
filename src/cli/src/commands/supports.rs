//! Supports command: capability discovery against a configured ledger.

use crate::contracts::parse_selector;
use crate::errors::CliError;
use ledger::{InterfaceId, LedgerConfig};
use notify::NotifyToken;
use tracing::debug;

/// Runs the supports command.
pub fn run(config: &LedgerConfig, interface: &str) -> Result<(InterfaceId, bool), CliError> {
    let id = parse_selector(interface)?;
    let host = config.build_host()?;
    let token = NotifyToken::new();

    debug!("Querying interface 0x{}", hex::encode(id));
    Ok((id, token.supports(&host, id)))
}
