//! Integration tests for concurrent batch de-identification

use fhir_deid::cli::commands::batch::run_batch;
use fhir_deid::deid::{AuditConfig, DeidConfig, DeidEngine, Pseudonymizer};
use fhir_deid::domain::DeidError;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn write_bundle(dir: &Path, name: &str, patient_id: &str) {
    let bundle = json!({
        "resourceType": "Bundle",
        "type": "collection",
        "entry": [
            {"resource": {"resourceType": "Patient", "id": patient_id, "name": [{"family": "Doe"}]}},
            {"resource": {
                "resourceType": "Observation",
                "id": format!("{patient_id}-obs"),
                "subject": {"reference": format!("Patient/{patient_id}"), "display": "Jane Doe"}
            }}
        ]
    });
    std::fs::write(dir.join(name), serde_json::to_vec(&bundle).unwrap()).unwrap();
}

#[tokio::test]
async fn test_batch_processes_every_document() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    for i in 0..10 {
        write_bundle(input.path(), &format!("bundle-{i:02}.json"), &format!("p{i}"));
    }

    let engine = Arc::new(DeidEngine::new(DeidConfig::default()).unwrap());
    let report = run_batch(engine, input.path(), output.path(), 3).await.unwrap();

    assert_eq!(report.processed, 10);
    assert!(report.failed.is_empty());
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.summary.entries, 20);
    assert_eq!(report.summary.references_rewritten, 10);
    assert_eq!(report.summary.resources_by_type["Patient"], 10);

    let out: Value =
        serde_json::from_slice(&std::fs::read(output.path().join("bundle-03.json")).unwrap())
            .unwrap();
    let pseudonym = Pseudonymizer::default().pseudonymize("p3");
    assert_eq!(out["entry"][0]["resource"]["id"], pseudonym);
    assert_eq!(
        out["entry"][1]["resource"]["subject"],
        json!({"reference": format!("Patient/{pseudonym}")})
    );
}

#[tokio::test]
async fn test_batch_isolates_failures() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    write_bundle(input.path(), "good.json", "p1");
    std::fs::write(input.path().join("broken.json"), b"{ not json").unwrap();
    std::fs::write(
        input.path().join("patient.json"),
        br#"{"resourceType":"Patient","id":"p2"}"#,
    )
    .unwrap();

    let engine = Arc::new(DeidEngine::new(DeidConfig::default()).unwrap());
    let report = run_batch(engine, input.path(), output.path(), 2).await.unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.failed.len(), 2);
    assert!(report
        .failed
        .iter()
        .all(|(_, e)| matches!(e, DeidError::Parse(_))));
    assert_eq!(report.exit_code(), 3);

    assert!(output.path().join("good.json").exists());
    assert!(!output.path().join("broken.json").exists());
    assert!(!output.path().join("patient.json").exists());
}

#[tokio::test]
async fn test_batch_writes_one_audit_line_per_document() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();
    let audit_dir = tempdir().unwrap();
    let log_path = audit_dir.path().join("audit.log");
    for i in 0..5 {
        write_bundle(input.path(), &format!("b{i}.json"), &format!("secret-{i}"));
    }

    let config = DeidConfig {
        audit: AuditConfig {
            enabled: true,
            log_path: log_path.clone(),
            json_format: true,
        },
        ..Default::default()
    };
    let engine = Arc::new(DeidEngine::new(config).unwrap());
    let report = run_batch(engine, input.path(), output.path(), 4).await.unwrap();
    assert_eq!(report.processed, 5);

    let content = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(content.lines().count(), 5);
    for line in content.lines() {
        let entry: Value = serde_json::from_str(line).unwrap();
        assert_eq!(entry["entries"], 2);
    }
    assert!(!content.contains("secret-"));
}

#[tokio::test]
async fn test_batch_empty_directory() {
    let input = tempdir().unwrap();
    let output = tempdir().unwrap();

    let engine = Arc::new(DeidEngine::new(DeidConfig::default()).unwrap());
    let report = run_batch(engine, input.path(), &output.path().join("nested"), 4)
        .await
        .unwrap();

    assert_eq!(report.processed, 0);
    assert_eq!(report.exit_code(), 0);
    assert!(output.path().join("nested").is_dir());
}
