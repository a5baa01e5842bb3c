//! Per-document de-identification summary
//!
//! Counts only. A summary never contains identifiers, labels or any other
//! value taken from the document, so it is safe to log and to audit.

use crate::deid::reference::ReferenceOutcome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Statistics for one processed Bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeidSummary {
    /// Entries visited
    pub entries: usize,

    /// Entries whose identity (`fullUrl` and/or `id`) was pseudonymized
    pub identities_rewritten: usize,

    /// Reference targets replaced by pseudonyms
    pub references_rewritten: usize,

    /// `display` labels removed from references
    pub labels_cleared: usize,

    /// Directly identifying members removed
    pub fields_cleared: usize,

    /// References whose target type could not be determined
    pub unresolved_targets: usize,

    /// Entries per resource type tag
    pub resources_by_type: BTreeMap<String, usize>,

    /// Entries per resource type tag that has no rule row
    pub unhandled_types: BTreeMap<String, usize>,

    /// Processing time for the document (ms)
    pub processing_time_ms: u64,
}

impl DeidSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visited entry of the given type
    pub fn add_resource(&mut self, resource_type: &str) {
        *self
            .resources_by_type
            .entry(resource_type.to_string())
            .or_insert(0) += 1;
    }

    /// Record an entry whose type has no rule row
    pub fn add_unhandled(&mut self, resource_type: &str) {
        *self
            .unhandled_types
            .entry(resource_type.to_string())
            .or_insert(0) += 1;
    }

    /// Fold in the outcome of one reference rewrite
    pub fn add_reference(&mut self, outcome: ReferenceOutcome) {
        if outcome.rewritten {
            self.references_rewritten += 1;
        }
        if outcome.label_cleared {
            self.labels_cleared += 1;
        }
        if outcome.unresolved {
            self.unresolved_targets += 1;
        }
    }

    /// Total entries with an unhandled resource type
    pub fn total_unhandled(&self) -> usize {
        self.unhandled_types.values().sum()
    }

    /// Merge another summary into this one (batch totals)
    pub fn merge(&mut self, other: &DeidSummary) {
        self.entries += other.entries;
        self.identities_rewritten += other.identities_rewritten;
        self.references_rewritten += other.references_rewritten;
        self.labels_cleared += other.labels_cleared;
        self.fields_cleared += other.fields_cleared;
        self.unresolved_targets += other.unresolved_targets;
        self.processing_time_ms += other.processing_time_ms;
        for (tag, count) in &other.resources_by_type {
            *self.resources_by_type.entry(tag.clone()).or_insert(0) += count;
        }
        for (tag, count) in &other.unhandled_types {
            *self.unhandled_types.entry(tag.clone()).or_insert(0) += count;
        }
    }
}

impl fmt::Display for DeidSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "De-identification Summary")?;
        writeln!(f, "=========================")?;
        writeln!(f, "Entries:              {}", self.entries)?;
        writeln!(f, "Identities rewritten: {}", self.identities_rewritten)?;
        writeln!(f, "References rewritten: {}", self.references_rewritten)?;
        writeln!(f, "Labels cleared:       {}", self.labels_cleared)?;
        writeln!(f, "Fields cleared:       {}", self.fields_cleared)?;
        writeln!(f, "Unresolved targets:   {}", self.unresolved_targets)?;
        writeln!(f, "Processing time:      {}ms", self.processing_time_ms)?;

        if !self.resources_by_type.is_empty() {
            writeln!(f)?;
            writeln!(f, "Resources by type:")?;
            for (tag, count) in &self.resources_by_type {
                writeln!(f, "  {tag}: {count}")?;
            }
        }

        if !self.unhandled_types.is_empty() {
            writeln!(f)?;
            writeln!(f, "Unhandled types (identity only):")?;
            for (tag, count) in &self.unhandled_types {
                writeln!(f, "  {tag}: {count}")?;
            }
        }

        Ok(())
    }
}
