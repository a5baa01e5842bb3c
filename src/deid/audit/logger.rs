//! Audit logger for de-identification requests

use crate::deid::report::DeidSummary;
use crate::domain::{DeidError, Result};
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    request_path: String,
    entries: usize,
    identities_rewritten: usize,
    references_rewritten: usize,
    labels_cleared: usize,
    fields_cleared: usize,
    unresolved_targets: usize,
    unhandled_types: BTreeMap<String, usize>,
    policy: String,
    processing_time_ms: u64,
    /// SHA-256 of the emitted document (never log the document itself)
    output_hash: String,
}

/// Audit logger for de-identification requests
///
/// Appends one line per rewritten document. Writes are serialized so the
/// logger can be shared by concurrent requests.
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DeidError::Audit(format!(
                        "Failed to create audit log directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            write_lock: Mutex::new(()),
        })
    }

    /// Log a rewritten document
    pub fn log_request(
        &self,
        request_path: &str,
        policy: &str,
        summary: &DeidSummary,
        output: &[u8],
    ) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            request_path: request_path.to_string(),
            entries: summary.entries,
            identities_rewritten: summary.identities_rewritten,
            references_rewritten: summary.references_rewritten,
            labels_cleared: summary.labels_cleared,
            fields_cleared: summary.fields_cleared,
            unresolved_targets: summary.unresolved_targets,
            unhandled_types: summary.unhandled_types.clone(),
            policy: policy.to_string(),
            processing_time_ms: summary.processing_time_ms,
            output_hash: hash_output(output),
        };

        self.write_entry(&entry)
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let line = if self.json_format {
            serde_json::to_string(entry)
                .map_err(|e| DeidError::Audit(format!("Failed to serialize audit entry: {e}")))?
        } else {
            format!(
                "[{}] Path: '{}' | Entries: {} | Identities: {} | References: {} | Labels: {} | Fields: {} | Policy: {} | Time: {}ms",
                entry.timestamp,
                entry.request_path,
                entry.entries,
                entry.identities_rewritten,
                entry.references_rewritten,
                entry.labels_cleared,
                entry.fields_cleared,
                entry.policy,
                entry.processing_time_ms
            )
        };

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| DeidError::Audit("Audit log lock poisoned".to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                DeidError::Audit(format!(
                    "Failed to open audit log {}: {}",
                    self.log_path.display(),
                    e
                ))
            })?;

        writeln!(file, "{line}")
            .map_err(|e| DeidError::Audit(format!("Failed to write audit entry: {e}")))?;

        Ok(())
    }
}

/// Hash the emitted document using SHA-256
fn hash_output(output: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(output);
    let result = hasher.finalize();
    format!("{result:x}")
}
