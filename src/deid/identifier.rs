//! Identifier extraction from reference strings
//!
//! Accepted shapes:
//! - `urn:uuid:<id>` (opaque-scheme form)
//! - `<ResourceType>/<id>` (typed form, possibly absolute)
//! - `<id>` (bare form)
//!
//! Identifiers that themselves contain `:` or `/` are not supported; only
//! their last segment is kept. Trailing delimiters are ignored when picking
//! that segment, and a string with no non-empty segment after a delimiter is
//! used whole, so an extracted id is never empty unless the input is.

const DELIMITERS: &[char] = &[':', '/'];

/// Returns the raw identifier carried by a reference string
///
/// # Examples
///
/// ```
/// use fhir_deid::deid::identifier::extract_id;
///
/// assert_eq!(extract_id("urn:uuid:ABC"), "ABC");
/// assert_eq!(extract_id("Patient/ABC"), "ABC");
/// assert_eq!(extract_id("ABC"), "ABC");
/// ```
pub fn extract_id(reference: &str) -> &str {
    let trimmed = reference.trim_end_matches(DELIMITERS);
    match trimmed.rsplit_once(DELIMITERS) {
        Some((_, last)) => last,
        None => reference,
    }
}

/// Returns the resource type segment of a typed reference, if any
///
/// For `Patient/123` or `http://server/fhir/Patient/123` this is `Patient`.
/// Opaque-scheme and bare references have no type segment.
pub fn type_segment(reference: &str) -> Option<&str> {
    if reference.starts_with("urn:") {
        return None;
    }
    let mut segments = reference.rsplit('/');
    segments.next()?;
    segments.next().filter(|segment| !segment.is_empty())
}
