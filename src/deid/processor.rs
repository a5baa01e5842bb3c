//! Record processor
//!
//! Applies the identity rewrite and the rule row of a resource type to one
//! Bundle entry.

use crate::deid::identifier::extract_id;
use crate::deid::pseudonym::Pseudonymizer;
use crate::deid::reference::ReferenceRewriter;
use crate::deid::report::DeidSummary;
use crate::deid::rules::{rule_for, ResourceRule};
use crate::domain::{BundleEntry, Resource};
use serde_json::Value;

/// Rewrites one entry at a time
pub struct RecordProcessor<'a> {
    pseudonymizer: Pseudonymizer,
    rewriter: ReferenceRewriter<'a>,
}

impl<'a> RecordProcessor<'a> {
    /// Create a processor sharing the rewriter of the current Bundle
    pub fn new(pseudonymizer: Pseudonymizer, rewriter: ReferenceRewriter<'a>) -> Self {
        Self {
            pseudonymizer,
            rewriter,
        }
    }

    /// De-identify one entry in place
    ///
    /// Entries without a resource, or whose resource has no `resourceType`,
    /// are left untouched.
    pub fn process_entry(&self, entry: &mut BundleEntry, summary: &mut DeidSummary) {
        summary.entries += 1;

        let Some(resource) = entry.resource.as_mut() else {
            tracing::debug!("Entry without resource left unchanged");
            return;
        };
        let Some(tag) = resource.resource_type_tag().map(str::to_string) else {
            tracing::warn!("Resource without resourceType left unchanged");
            return;
        };
        summary.add_resource(&tag);

        if self.rewrite_identity(&tag, &mut entry.full_url, resource) {
            summary.identities_rewritten += 1;
        }

        match resource.resource_type() {
            Some(resource_type) => self.apply_rule(rule_for(resource_type), resource, summary),
            None => {
                tracing::debug!(
                    resource_type = %tag,
                    "No rule row for resource type; identity rewritten only"
                );
                summary.add_unhandled(&tag);
            }
        }
    }

    /// Pseudonymize the entry's `fullUrl` and the resource's `id`
    ///
    /// The raw id is taken from `fullUrl` when present, otherwise from `id`.
    /// Returns false when neither exists.
    fn rewrite_identity(
        &self,
        tag: &str,
        full_url: &mut Option<String>,
        resource: &mut Resource,
    ) -> bool {
        let pseudonym = match (full_url.as_deref(), resource.id()) {
            (Some(url), _) => self.pseudonymizer.pseudonymize(extract_id(url)),
            (None, Some(id)) => self.pseudonymizer.pseudonymize(extract_id(id)),
            (None, None) => return false,
        };

        if full_url.is_some() {
            *full_url = Some(format!("{tag}/{pseudonym}"));
        }
        resource.set_id(pseudonym);
        true
    }

    /// Rewrite every reference the rule names, then clear its fields
    fn apply_rule(&self, rule: &ResourceRule, resource: &mut Resource, summary: &mut DeidSummary) {
        for path in rule.references {
            if let Some((first, rest)) = path.split_first() {
                if let Some(value) = resource.get_mut(first) {
                    visit_references(value, rest, &mut |reference: &mut Value| {
                        summary.add_reference(self.rewriter.rewrite(reference));
                    });
                }
            }
        }

        for field in rule.clear {
            if resource.clear_field(field) {
                summary.fields_cleared += 1;
            }
        }
    }
}

/// Call `f` on every value reachable from `value` along `path`
///
/// Arrays are walked element by element at every step, including at the end
/// of the path, so singular, repeated and nested references are all reached.
fn visit_references(value: &mut Value, path: &[&str], f: &mut dyn FnMut(&mut Value)) {
    if let Value::Array(items) = value {
        for item in items {
            visit_references(item, path, f);
        }
        return;
    }

    match path.split_first() {
        None => f(value),
        Some((first, rest)) => {
            if let Some(child) = value.get_mut(*first) {
                visit_references(child, rest, f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deid::reference::{ReferencePolicy, TargetIndex};
    use serde_json::json;

    fn pseudonym(raw: &str) -> String {
        Pseudonymizer::default().pseudonymize(raw)
    }

    fn process(entry: &mut BundleEntry) -> DeidSummary {
        let index = TargetIndex::default();
        let rewriter =
            ReferenceRewriter::new(Pseudonymizer::default(), ReferencePolicy::Pseudonymize, &index);
        let processor = RecordProcessor::new(Pseudonymizer::default(), rewriter);
        let mut summary = DeidSummary::new();
        processor.process_entry(entry, &mut summary);
        summary
    }

    fn entry(full_url: Option<&str>, resource: Value) -> BundleEntry {
        BundleEntry::new(full_url, Resource::from_value(resource).unwrap())
    }

    #[test]
    fn test_visit_nested_arrays() {
        let mut value = json!([
            {"performer": [{"actor": {"reference": "a"}}, {"actor": {"reference": "b"}}]},
            {"performer": [{"actor": {"reference": "c"}}]},
            {"other": true}
        ]);
        let mut seen = Vec::new();
        visit_references(&mut value, &["performer", "actor"], &mut |v: &mut Value| {
            seen.push(v["reference"].as_str().unwrap().to_string());
        });
        assert_eq!(seen, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_identity_prefers_full_url() {
        let mut e = entry(
            Some("urn:uuid:from-url"),
            json!({"resourceType": "Encounter", "id": "from-id"}),
        );
        let summary = process(&mut e);

        let expected = pseudonym("from-url");
        assert_eq!(e.full_url, Some(format!("Encounter/{expected}")));
        let resource = e.resource.as_ref().unwrap();
        assert_eq!(resource.id(), Some(expected.as_str()));
        assert_eq!(resource.identity(), Some(format!("Encounter/{expected}")));
        assert_eq!(summary.identities_rewritten, 1);
    }

    #[test]
    fn test_identity_from_id_without_full_url() {
        let mut e = entry(None, json!({"resourceType": "Encounter", "id": "123"}));
        process(&mut e);

        assert!(e.full_url.is_none());
        assert_eq!(
            e.resource.as_ref().unwrap().identity(),
            Some(format!("Encounter/{}", pseudonym("123")))
        );
    }

    #[test]
    fn test_entry_without_identity() {
        let mut e = entry(None, json!({"resourceType": "Observation", "status": "final"}));
        let summary = process(&mut e);

        assert_eq!(summary.identities_rewritten, 0);
        assert!(e.resource.as_ref().unwrap().id().is_none());
    }

    #[test]
    fn test_patient_fields_cleared() {
        let mut e = entry(
            None,
            json!({
                "resourceType": "Patient",
                "id": "p1",
                "identifier": [{"system": "urn:mrn", "value": "12345"}],
                "name": [{"family": "Doe", "given": ["Jane"]}],
                "telecom": [{"system": "phone", "value": "555-0100"}],
                "address": [{"city": "Springfield"}],
                "gender": "female",
                "birthDate": "1970-01-01",
                "managingOrganization": {"reference": "Organization/o1", "display": "General"}
            }),
        );
        let summary = process(&mut e);
        let resource = e.resource.as_ref().unwrap();

        for field in ["identifier", "name", "telecom", "address"] {
            assert!(resource.get(field).is_none(), "{field} not cleared");
        }
        assert_eq!(resource.get("gender"), Some(&json!("female")));
        assert_eq!(resource.get("birthDate"), Some(&json!("1970-01-01")));
        assert_eq!(
            resource.get("managingOrganization"),
            Some(&json!({"reference": format!("Organization/{}", pseudonym("o1"))}))
        );
        assert_eq!(summary.fields_cleared, 4);
        assert_eq!(summary.references_rewritten, 1);
        assert_eq!(summary.labels_cleared, 1);
    }

    #[test]
    fn test_unhandled_type_identity_only() {
        let body = json!({
            "resourceType": "Basic",
            "id": "b1",
            "subject": {"reference": "Patient/p1", "display": "Jane Doe"}
        });
        let mut e = entry(None, body.clone());
        let summary = process(&mut e);
        let resource = e.resource.as_ref().unwrap();

        assert_eq!(resource.id(), Some(pseudonym("b1").as_str()));
        assert_eq!(resource.get("subject"), Some(&body["subject"]));
        assert_eq!(summary.unhandled_types["Basic"], 1);
        assert_eq!(summary.references_rewritten, 0);
    }

    #[test]
    fn test_entry_without_resource() {
        let mut e = BundleEntry {
            full_url: Some("urn:uuid:x".to_string()),
            ..Default::default()
        };
        let summary = process(&mut e);
        assert_eq!(summary.entries, 1);
        assert_eq!(e.full_url.as_deref(), Some("urn:uuid:x"));
    }
}
