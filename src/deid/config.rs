//! De-identification engine configuration

use crate::deid::pseudonym::Pseudonymizer;
use crate::deid::reference::ReferencePolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeidConfig {
    /// Hash primitive used for pseudonyms (`sha256` or `sha512_256`)
    #[serde(default = "default_hash_algorithm")]
    pub hash_algorithm: String,

    /// How reference targets are treated
    #[serde(default)]
    pub reference_policy: ReferencePolicy,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_hash_algorithm() -> String {
    "sha256".to_string()
}

impl Default for DeidConfig {
    fn default() -> Self {
        Self {
            hash_algorithm: default_hash_algorithm(),
            reference_policy: ReferencePolicy::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl DeidConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        Pseudonymizer::from_name(&self.hash_algorithm).context("Invalid hash_algorithm")?;

        self.audit.validate().context("Invalid audit configuration")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("FHIR_DEID_ENGINE_HASH_ALGORITHM") {
            self.hash_algorithm = val;
        }

        if let Ok(val) = std::env::var("FHIR_DEID_ENGINE_REFERENCE_POLICY") {
            self.reference_policy = val
                .parse::<ReferencePolicy>()
                .context("Invalid FHIR_DEID_ENGINE_REFERENCE_POLICY value")?;
        }

        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/deidentification.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("audit.log_path cannot be empty when auditing is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("FHIR_DEID_AUDIT_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid FHIR_DEID_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("FHIR_DEID_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("FHIR_DEID_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid FHIR_DEID_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeidConfig::default();
        assert_eq!(config.hash_algorithm, "sha256");
        assert_eq!(config.reference_policy, ReferencePolicy::Pseudonymize);
        assert!(!config.audit.enabled);
        assert!(config.audit.json_format);
    }

    #[test]
    fn test_config_validation() {
        let config = DeidConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_hash_algorithm_rejected() {
        let config = DeidConfig {
            hash_algorithm: "md5".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_audit_path_rejected() {
        let audit = AuditConfig {
            enabled: true,
            log_path: PathBuf::new(),
            json_format: true,
        };
        assert!(audit.validate().is_err());
    }

    #[test]
    fn test_deserialize_policy() {
        let config: DeidConfig = toml::from_str(r#"reference_policy = "display_only""#).unwrap();
        assert_eq!(config.reference_policy, ReferencePolicy::DisplayOnly);
        assert_eq!(config.hash_algorithm, "sha256");
    }
}
