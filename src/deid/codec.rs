//! Bundle wire codec
//!
//! JSON in, JSON out. Parsing failures and non-Bundle bodies are `Parse`
//! errors; serialization failures are `Serialization` errors. Both are fatal
//! for the request.

use crate::domain::{Bundle, DeidError, Result, BUNDLE_RESOURCE_TYPE};

/// Parse a request or response body into a Bundle
pub fn parse_bundle(body: &[u8]) -> Result<Bundle> {
    let bundle: Bundle = serde_json::from_slice(body)
        .map_err(|e| DeidError::Parse(format!("Invalid Bundle JSON: {e}")))?;

    if bundle.resource_type != BUNDLE_RESOURCE_TYPE {
        return Err(DeidError::Parse(format!(
            "Expected resourceType '{}', got '{}'",
            BUNDLE_RESOURCE_TYPE, bundle.resource_type
        )));
    }

    Ok(bundle)
}

/// Serialize a Bundle back into a body
pub fn serialize_bundle(bundle: &Bundle) -> Result<Vec<u8>> {
    serde_json::to_vec(bundle)
        .map_err(|e| DeidError::Serialization(format!("Failed to serialize Bundle: {e}")))
}

/// Serialize a Bundle with indentation, for human consumption
pub fn serialize_bundle_pretty(bundle: &Bundle) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(bundle)
        .map_err(|e| DeidError::Serialization(format!("Failed to serialize Bundle: {e}")))
}
