//! Result type alias for fhir-deid
//!
//! This module provides a convenient Result type alias that uses DeidError
//! as the error type.

use super::errors::DeidError;

/// Result type alias for fhir-deid operations
///
/// # Examples
///
/// ```
/// use fhir_deid::domain::result::Result;
/// use fhir_deid::domain::errors::DeidError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(DeidError::Parse("not a bundle".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DeidError>;
