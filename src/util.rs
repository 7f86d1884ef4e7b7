//! Utility functions shared across the auction crate.

use crate::error::{GavelError, GavelResult};
use serde::de::DeserializeOwned;

/// Format an amount of cents as a dollar string, e.g. `10550` -> `"$105.50"`.
pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Deserialize CBOR data with a size limit to reject oversized payloads.
pub fn cbor_from_limited_reader<T: DeserializeOwned>(
    data: &[u8],
    max_bytes: usize,
) -> GavelResult<T> {
    if data.len() > max_bytes {
        return Err(GavelError::Serialization(format!(
            "CBOR payload too large: {} bytes (max {})",
            data.len(),
            max_bytes
        )));
    }
    ciborium::from_reader(data)
        .map_err(|e| GavelError::Serialization(format!("CBOR deserialization failed: {e}")))
}
