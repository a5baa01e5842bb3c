//! De-identification engine
//!
//! Drives one request through the pipeline: gate, parse, rewrite every entry,
//! serialize, audit. The engine holds no per-request state and can be shared
//! behind an `Arc` by concurrent workers.

use crate::deid::audit::AuditLogger;
use crate::deid::codec::{parse_bundle, serialize_bundle, serialize_bundle_pretty};
use crate::deid::config::DeidConfig;
use crate::deid::gate;
use crate::deid::processor::RecordProcessor;
use crate::deid::pseudonym::Pseudonymizer;
use crate::deid::reference::{ReferencePolicy, ReferenceRewriter, TargetIndex};
use crate::deid::report::DeidSummary;
use crate::domain::{Bundle, Result};
use std::time::Instant;

/// Outcome of running the engine on a request
#[derive(Debug, Clone, PartialEq)]
pub enum RequestMutation {
    /// The request is not a Bundle submission; forward it unchanged
    PassThrough,

    /// The Bundle was de-identified
    Rewritten {
        /// Re-serialized Bundle
        body: Vec<u8>,
        /// Counts for the processed Bundle
        summary: DeidSummary,
    },
}

/// De-identification engine
pub struct DeidEngine {
    config: DeidConfig,
    pseudonymizer: Pseudonymizer,
    audit_logger: Option<AuditLogger>,
    pretty_output: bool,
}

impl DeidEngine {
    /// Create an engine from configuration
    ///
    /// Fails with `HashUnavailable` when the configured hash primitive is not
    /// supported, and with `Audit` when the audit log cannot be prepared.
    pub fn new(config: DeidConfig) -> Result<Self> {
        let pseudonymizer = Pseudonymizer::from_name(&config.hash_algorithm)?;

        let audit_logger = if config.audit.enabled {
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
            )?)
        } else {
            None
        };

        tracing::debug!(
            hash_algorithm = %pseudonymizer.algorithm(),
            reference_policy = %config.reference_policy,
            audit_enabled = config.audit.enabled,
            "De-identification engine initialized"
        );

        Ok(Self {
            config,
            pseudonymizer,
            audit_logger,
            pretty_output: false,
        })
    }

    /// Emit indented JSON instead of compact JSON
    ///
    /// The audit `output_hash` always covers the body as emitted.
    pub fn with_pretty_output(mut self, pretty: bool) -> Self {
        self.pretty_output = pretty;
        self
    }

    /// Reference policy in effect
    pub fn policy(&self) -> ReferencePolicy {
        self.config.reference_policy
    }

    /// Whether a request to `request_path` is rewritten
    pub fn is_applicable(&self, request_path: &str) -> bool {
        gate::is_applicable(request_path)
    }

    /// Run the engine on an inbound request
    ///
    /// Either every entry is rewritten and the new body returned, or an error
    /// is returned and no output is produced.
    pub fn mutate_request(&self, request_path: &str, body: &[u8]) -> Result<RequestMutation> {
        if !self.is_applicable(request_path) {
            tracing::trace!(request_path, "Request not applicable; passing through");
            return Ok(RequestMutation::PassThrough);
        }

        let mut bundle = parse_bundle(body)?;
        let summary = self.deidentify_bundle(&mut bundle);
        let body = if self.pretty_output {
            serialize_bundle_pretty(&bundle)?
        } else {
            serialize_bundle(&bundle)?
        };

        if let Some(logger) = &self.audit_logger {
            logger.log_request(
                request_path,
                &self.config.reference_policy.to_string(),
                &summary,
                &body,
            )?;
        }

        tracing::info!(
            request_path,
            entries = summary.entries,
            references_rewritten = summary.references_rewritten,
            fields_cleared = summary.fields_cleared,
            duration_ms = summary.processing_time_ms,
            "Bundle de-identified"
        );

        Ok(RequestMutation::Rewritten { body, summary })
    }

    /// Response bodies are forwarded unchanged
    pub fn post_process(&self, _request_path: &str, _body: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    /// De-identify a parsed Bundle in place
    ///
    /// Reference targets are indexed before any entry is rewritten so that
    /// target types resolve against the original identities.
    pub fn deidentify_bundle(&self, bundle: &mut Bundle) -> DeidSummary {
        let start = Instant::now();
        let targets = TargetIndex::build(bundle);
        let rewriter =
            ReferenceRewriter::new(self.pseudonymizer, self.config.reference_policy, &targets);
        let processor = RecordProcessor::new(self.pseudonymizer, rewriter);

        let mut summary = DeidSummary::new();
        for entry in bundle.entries_mut() {
            processor.process_entry(entry, &mut summary);
        }

        if summary.unresolved_targets > 0 {
            tracing::warn!(
                unresolved = summary.unresolved_targets,
                "Some reference targets were written without a type"
            );
        }

        summary.processing_time_ms = start.elapsed().as_millis() as u64;
        summary
    }
}
