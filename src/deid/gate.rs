//! Applicability gate
//!
//! Document-level rewriting applies only to Bundle submissions: requests
//! addressed to the server root or to the `Bundle` endpoint. Every other
//! request passes through untouched.

use crate::domain::BUNDLE_RESOURCE_TYPE;

/// Returns true when the request path designates a Bundle submission
///
/// The comparison is exact: `"/Bundle"` or `"Bundle/123"` do not match.
///
/// # Examples
///
/// ```
/// use fhir_deid::deid::gate::is_applicable;
///
/// assert!(is_applicable(""));
/// assert!(is_applicable("Bundle"));
/// assert!(!is_applicable("Patient"));
/// ```
pub fn is_applicable(request_path: &str) -> bool {
    request_path.is_empty() || request_path == BUNDLE_RESOURCE_TYPE
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("" => true; "server root")]
    #[test_case("Bundle" => true; "bundle endpoint")]
    #[test_case("Patient" => false; "other resource type")]
    #[test_case("Bundle/123" => false; "bundle instance")]
    #[test_case("/Bundle" => false; "leading slash")]
    #[test_case("bundle" => false; "lower case")]
    #[test_case("Patient/123/_history/1" => false; "history path")]
    fn test_is_applicable(path: &str) -> bool {
        is_applicable(path)
    }
}
