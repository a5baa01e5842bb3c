//! Integration tests for resource rule coverage
//!
//! Builds one resource per registered type with every reference path of its
//! rule row populated, and checks the engine reaches all of them.

use fhir_deid::deid::rules::{identity_only_types, rule_for};
use fhir_deid::deid::{DeidConfig, DeidEngine, RequestMutation};
use fhir_deid::domain::ResourceType;
use serde_json::{json, Map, Value};
use test_case::test_case;

/// Build a value holding a labelled reference at the end of `path`
fn nest(path: &[&str], leaf: Value) -> Value {
    match path.split_first() {
        None => leaf,
        Some((first, rest)) => {
            let mut map = Map::new();
            map.insert(first.to_string(), nest(rest, leaf));
            Value::Object(map)
        }
    }
}

/// Merge `src` into `dst`, combining objects that share a member
fn merge(dst: &mut Value, src: Value) {
    match (dst, src) {
        (Value::Object(d), Value::Object(s)) => {
            for (key, value) in s {
                match d.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        d.insert(key, value);
                    }
                }
            }
        }
        (dst, src) => *dst = src,
    }
}

fn populated_resource(resource_type: ResourceType) -> Value {
    let mut resource = json!({"resourceType": resource_type.as_str(), "id": "raw-id"});
    for path in rule_for(resource_type).references {
        let leaf = json!({"reference": "Patient/raw-target", "display": "Jane Doe"});
        merge(&mut resource, nest(path, leaf));
    }
    resource
}

fn run(resource: Value) -> (Value, fhir_deid::deid::DeidSummary) {
    let engine = DeidEngine::new(DeidConfig::default()).unwrap();
    let bundle = json!({"resourceType": "Bundle", "type": "collection", "entry": [{"resource": resource}]});
    let body = serde_json::to_vec(&bundle).unwrap();
    match engine.mutate_request("", &body).unwrap() {
        RequestMutation::Rewritten { body, summary } => {
            let out: Value = serde_json::from_slice(&body).unwrap();
            (out["entry"][0]["resource"].clone(), summary)
        }
        RequestMutation::PassThrough => panic!("root request was not rewritten"),
    }
}

#[test]
fn test_every_reference_path_is_rewritten() {
    for resource_type in ResourceType::ALL {
        let rule = rule_for(resource_type);
        let (resource, summary) = run(populated_resource(resource_type));
        let text = serde_json::to_string(&resource).unwrap();

        assert!(
            !text.contains("raw-target"),
            "{resource_type}: a reference target was not rewritten"
        );
        assert!(
            !text.contains("Jane Doe"),
            "{resource_type}: a display label was not cleared"
        );
        assert_eq!(
            summary.references_rewritten,
            rule.references.len(),
            "{resource_type}: unexpected reference count"
        );
        assert_eq!(summary.total_unhandled(), 0);
    }
}

#[test]
fn test_identity_only_types_are_intentional() {
    let types = identity_only_types();
    assert_eq!(
        types,
        vec![
            ResourceType::OperationOutcome,
            ResourceType::Practitioner,
            ResourceType::PractitionerRole,
        ]
    );
}

#[test_case(ResourceType::Encounter, &["participant", "individual"]; "encounter participant")]
#[test_case(ResourceType::Observation, &["performer"]; "observation performer")]
#[test_case(ResourceType::Patient, &["link", "other"]; "patient link")]
#[test_case(ResourceType::CarePlan, &["activity", "reference"]; "care plan activity")]
fn test_repeated_references_rewritten(resource_type: ResourceType, path: &[&str]) {
    let (first, rest) = path.split_first().unwrap();
    let element = |raw: &str| nest(rest, json!({"reference": format!("Patient/{raw}")}));
    let mut resource = json!({"resourceType": resource_type.as_str()});
    resource[*first] = json!([element("a"), element("b"), element("c")]);

    let (out, summary) = run(resource);
    assert_eq!(summary.references_rewritten, 3);
    assert_eq!(out[*first].as_array().unwrap().len(), 3);
}
