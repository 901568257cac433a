//! Call data codec: a 4-byte selector followed by bincode encoded arguments.

use crate::errors::{LedgerError, Revert};
use crate::types::Selector;
use serde::{de::DeserializeOwned, Serialize};

/// Encodes a call to `selector` with the given arguments.
pub fn encode_call<T: Serialize>(selector: Selector, args: &T) -> Result<Vec<u8>, LedgerError> {
    let body =
        bincode::serialize(args).map_err(|e| LedgerError::SerializationError(e.to_string()))?;
    let mut input = Vec::with_capacity(4 + body.len());
    input.extend_from_slice(&selector);
    input.extend_from_slice(&body);
    Ok(input)
}

/// Splits call data into its selector and argument body.
pub fn split_selector(input: &[u8]) -> Result<(Selector, &[u8]), Revert> {
    if input.len() < 4 {
        return Err(Revert::MalformedInput(format!(
            "call data too short: {} bytes",
            input.len()
        )));
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&input[..4]);
    Ok((selector, &input[4..]))
}

/// Decodes the arguments of a call, checking that it targets `expected`.
pub fn decode_call<T: DeserializeOwned>(input: &[u8], expected: Selector) -> Result<T, Revert> {
    let (selector, body) = split_selector(input)?;
    if selector != expected {
        return Err(Revert::UnknownSelector(selector));
    }
    bincode::deserialize(body).map_err(|e| Revert::MalformedInput(e.to_string()))
}
