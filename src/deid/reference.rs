//! Reference rewriting
//!
//! A FHIR `Reference` is a JSON object with an optional `reference` string,
//! an optional `display` label and an optional `type`. Rewriting always drops
//! the label. Under [`ReferencePolicy::Pseudonymize`] the target string is also
//! replaced by `"<TargetType>/<pseudonym>"`, which is exactly the identity the
//! referenced entry receives, so the reference still resolves.

use crate::deid::identifier::{extract_id, type_segment};
use crate::deid::pseudonym::Pseudonymizer;
use crate::domain::{Bundle, DeidError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How reference targets are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferencePolicy {
    /// Pseudonymize the target and clear the label (keeps references resolvable)
    #[default]
    Pseudonymize,
    /// Clear the label only; the target string is forwarded unchanged
    DisplayOnly,
}

impl fmt::Display for ReferencePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pseudonymize => write!(f, "pseudonymize"),
            Self::DisplayOnly => write!(f, "display_only"),
        }
    }
}

impl FromStr for ReferencePolicy {
    type Err = DeidError;

    /// Accepts the configuration names case-insensitively, with `-` or `_`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pseudonymize" => Ok(Self::Pseudonymize),
            "display_only" => Ok(Self::DisplayOnly),
            _ => Err(DeidError::Configuration(format!(
                "'{s}' is not a reference policy. Must be one of: pseudonymize, display_only"
            ))),
        }
    }
}

/// Resource types of the entries of one Bundle, keyed by how they can be referenced
///
/// Built from the Bundle before any rewriting. It maps reference strings to
/// resource type tags only; it never holds pseudonyms.
#[derive(Debug, Default)]
pub struct TargetIndex {
    types: HashMap<String, String>,
}

impl TargetIndex {
    /// Index every entry by its `fullUrl` and by `"<resourceType>/<id>"`
    pub fn build(bundle: &Bundle) -> Self {
        let mut types = HashMap::new();
        for entry in bundle.entries() {
            let Some(resource) = entry.resource.as_ref() else {
                continue;
            };
            let Some(tag) = resource.resource_type_tag() else {
                continue;
            };
            if let Some(full_url) = entry.full_url.as_deref() {
                types.insert(full_url.to_string(), tag.to_string());
            }
            if let Some(identity) = resource.identity() {
                types.insert(identity, tag.to_string());
            }
        }
        Self { types }
    }

    /// Number of indexed reference strings
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// True when nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Resource type of the entry a reference string designates
    pub fn lookup(&self, reference: &str) -> Option<&str> {
        self.types.get(reference).map(String::as_str)
    }
}

/// Result of rewriting a single reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceOutcome {
    /// The target string was replaced by a pseudonym
    pub rewritten: bool,
    /// A `display` label was removed
    pub label_cleared: bool,
    /// The target type could not be determined; a bare pseudonym was written
    pub unresolved: bool,
}

/// Rewrites references in place for one Bundle
pub struct ReferenceRewriter<'a> {
    pseudonymizer: Pseudonymizer,
    policy: ReferencePolicy,
    targets: &'a TargetIndex,
}

impl<'a> ReferenceRewriter<'a> {
    /// Create a rewriter bound to a Bundle's target index
    pub fn new(
        pseudonymizer: Pseudonymizer,
        policy: ReferencePolicy,
        targets: &'a TargetIndex,
    ) -> Self {
        Self {
            pseudonymizer,
            policy,
            targets,
        }
    }

    /// Rewrite one `Reference` value
    ///
    /// Values that are not JSON objects are left alone. A reference without a
    /// target string only loses its label. Local references to contained
    /// resources (`#id`) keep their target, since contained ids are not
    /// rewritten.
    pub fn rewrite(&self, value: &mut Value) -> ReferenceOutcome {
        let mut outcome = ReferenceOutcome::default();
        let Value::Object(reference) = value else {
            return outcome;
        };

        outcome.label_cleared = reference.shift_remove("display").is_some();

        if self.policy == ReferencePolicy::DisplayOnly {
            return outcome;
        }

        let target = match reference.get("reference").and_then(Value::as_str) {
            Some(target) if !target.is_empty() && !target.starts_with('#') => target,
            _ => return outcome,
        };

        let pseudonym = self.pseudonymizer.pseudonymize(extract_id(target));
        let declared_type = reference.get("type").and_then(Value::as_str);

        let rewritten = match self.target_type(target, declared_type) {
            Some(target_type) => format!("{target_type}/{pseudonym}"),
            None => {
                tracing::warn!(
                    "Reference target type could not be determined; writing bare pseudonym"
                );
                outcome.unresolved = true;
                pseudonym
            }
        };

        reference.insert("reference".to_string(), Value::String(rewritten));
        outcome.rewritten = true;
        outcome
    }

    /// Determine the resource type a reference points at
    ///
    /// Order: the referenced entry in the same Bundle, the type segment of a
    /// typed reference, then the reference's own `type` member.
    fn target_type(&self, target: &str, declared_type: Option<&str>) -> Option<String> {
        if let Some(tag) = self.targets.lookup(target) {
            return Some(tag.to_string());
        }
        if let Some(segment) = type_segment(target).filter(|s| is_type_name(s)) {
            return Some(segment.to_string());
        }
        declared_type
            .map(|declared| declared.rsplit('/').next().unwrap_or(declared))
            .filter(|name| is_type_name(name))
            .map(str::to_string)
    }
}

/// FHIR resource type names are PascalCase ASCII identifiers
fn is_type_name(candidate: &str) -> bool {
    candidate.starts_with(|c: char| c.is_ascii_uppercase())
        && candidate.chars().all(|c| c.is_ascii_alphanumeric())
}
