//! Domain error types
//!
//! This module defines the error hierarchy for fhir-deid.
//! All errors are domain-specific and don't expose third-party types.
//!
//! Only fatal conditions are represented here. Malformed or absent reference
//! strings and unknown resource types are absorbed by the engine and never
//! surface as errors.

use thiserror::Error;

/// Main fhir-deid error type
///
/// Every variant aborts the request that raised it; no partially rewritten
/// document is ever returned alongside an error.
#[derive(Debug, Error)]
pub enum DeidError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The configured hash primitive is not available in this build
    #[error("Hash primitive unavailable: {0}")]
    HashUnavailable(String),

    /// The request body could not be parsed into a Bundle
    #[error("Parse error: {0}")]
    Parse(String),

    /// The rewritten Bundle could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Audit log errors
    #[error("Audit error: {0}")]
    Audit(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for DeidError {
    fn from(err: std::io::Error) -> Self {
        DeidError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for DeidError {
    fn from(err: serde_json::Error) -> Self {
        DeidError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for DeidError {
    fn from(err: toml::de::Error) -> Self {
        DeidError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deid_error_display() {
        let err = DeidError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");

        let err = DeidError::HashUnavailable("md5".to_string());
        assert_eq!(err.to_string(), "Hash primitive unavailable: md5");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: DeidError = io_err.into();
        assert!(matches!(err, DeidError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: DeidError = json_err.into();
        assert!(matches!(err, DeidError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: DeidError = toml_err.into();
        assert!(matches!(err, DeidError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_deid_error_implements_std_error() {
        let err = DeidError::Parse("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
