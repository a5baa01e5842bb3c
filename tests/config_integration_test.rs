//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` to avoid
//! interference between tests.

use fhir_deid::config::{load_config, load_config_or_default};
use fhir_deid::deid::ReferencePolicy;
use fhir_deid::domain::DeidError;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("FHIR_DEID_APPLICATION_LOG_LEVEL");
    std::env::remove_var("FHIR_DEID_ENGINE_HASH_ALGORITHM");
    std::env::remove_var("FHIR_DEID_ENGINE_REFERENCE_POLICY");
    std::env::remove_var("FHIR_DEID_AUDIT_ENABLED");
    std::env::remove_var("FHIR_DEID_AUDIT_LOG_PATH");
    std::env::remove_var("FHIR_DEID_LOGGING_LOCAL_ENABLED");
    std::env::remove_var("TEST_DEID_AUDIT_DIR");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[engine]
hash_algorithm = "sha512_256"
reference_policy = "display_only"

[engine.audit]
enabled = true
log_path = "/var/log/fhir-deid/audit.log"
json_format = false

[logging]
local_enabled = true
local_path = "/tmp/fhir-deid"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.engine.hash_algorithm, "sha512_256");
    assert_eq!(config.engine.reference_policy, ReferencePolicy::DisplayOnly);
    assert!(config.engine.audit.enabled);
    assert_eq!(
        config.engine.audit.log_path,
        PathBuf::from("/var/log/fhir-deid/audit.log")
    );
    assert!(!config.engine.audit.json_format);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_DEID_AUDIT_DIR", "/srv/audit");

    let temp_file = write_config(
        r#"
# log_path = "${UNSET_IN_COMMENT}"
[engine.audit]
enabled = true
log_path = "${TEST_DEID_AUDIT_DIR}/deid.log"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(
        config.engine.audit.log_path,
        PathBuf::from("/srv/audit/deid.log")
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[engine.audit]
log_path = "${TEST_DEID_AUDIT_DIR}/deid.log"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(matches!(err, DeidError::Configuration(_)));
    assert!(err.to_string().contains("TEST_DEID_AUDIT_DIR"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("FHIR_DEID_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("FHIR_DEID_ENGINE_REFERENCE_POLICY", "display_only");
    std::env::set_var("FHIR_DEID_AUDIT_ENABLED", "true");
    std::env::set_var("FHIR_DEID_AUDIT_LOG_PATH", "/tmp/override.log");

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[engine]
reference_policy = "pseudonymize"
"#,
    );

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.engine.reference_policy, ReferencePolicy::DisplayOnly);
    assert!(config.engine.audit.enabled);
    assert_eq!(
        config.engine.audit.log_path,
        PathBuf::from("/tmp/override.log")
    );

    cleanup_env_vars();
}

#[test]
fn test_policy_env_override_matches_cli_names() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("FHIR_DEID_ENGINE_REFERENCE_POLICY", "display-only");

    let config = load_config_or_default("does-not-exist.toml").unwrap();
    assert_eq!(config.engine.reference_policy, ReferencePolicy::DisplayOnly);

    std::env::set_var("FHIR_DEID_ENGINE_REFERENCE_POLICY", "redact");
    let result = load_config_or_default("does-not-exist.toml");
    assert!(matches!(result, Err(DeidError::Configuration(_))));

    cleanup_env_vars();
}

#[test]
fn test_invalid_env_override_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("FHIR_DEID_ENGINE_HASH_ALGORITHM", "md5");

    let result = load_config_or_default("does-not-exist.toml");
    assert!(matches!(result, Err(DeidError::Configuration(_))));

    cleanup_env_vars();
}

#[test]
fn test_missing_file_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    assert!(load_config("does-not-exist.toml").is_err());

    let config = load_config_or_default("does-not-exist.toml").unwrap();
    assert_eq!(config.engine.hash_algorithm, "sha256");
    assert_eq!(config.engine.reference_policy, ReferencePolicy::Pseudonymize);
    assert!(!config.engine.audit.enabled);
}

#[test]
fn test_invalid_values_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let cases = [
        "[application]\nlog_level = \"loud\"\n",
        "[engine]\nhash_algorithm = \"md5\"\n",
        "[engine]\nreference_policy = \"drop\"\n",
        "[logging]\nlocal_rotation = \"weekly\"\n",
    ];

    for case in cases {
        let temp_file = write_config(case);
        let result = load_config(temp_file.path());
        assert!(
            matches!(result, Err(DeidError::Configuration(_))),
            "accepted invalid config: {case}"
        );
    }
}
