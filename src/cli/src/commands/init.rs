//! Init command: writes the sample scenario.

use crate::errors::CliError;
use crate::scenario::Scenario;
use ledger::TokenInfo;
use std::path::Path;
use tracing::info;

/// Runs the init command, optionally overriding the sample token metadata.
pub fn run<P: AsRef<Path>>(output: P, token: Option<TokenInfo>) -> Result<(), CliError> {
    let output = output.as_ref();
    if output.exists() {
        return Err(CliError::InvalidInput(format!(
            "{} already exists",
            output.display()
        )));
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut scenario = Scenario::sample();
    if let Some(token) = token {
        scenario.config.token = token;
    }
    scenario.to_file(output)?;
    info!("Wrote sample scenario to {}", output.display());
    Ok(())
}
