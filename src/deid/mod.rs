//! De-identification module
//!
//! Rewrites a FHIR Bundle so that no entry keeps its original identity while
//! every reference between entries still resolves.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! - **Gate**: only Bundle submissions are rewritten
//! - **Pseudonymizer**: stateless one-way hash of raw identifiers
//! - **Rules**: per resource type reference paths and fields to clear
//! - **Reference rewriter**: pseudonymizes targets and removes labels
//! - **Processor**: applies the identity rewrite and the rule row to one entry
//! - **Engine**: parses, processes every entry, serializes and audits
//!
//! # Usage
//!
//! ```rust
//! use fhir_deid::deid::{DeidConfig, DeidEngine, RequestMutation};
//!
//! let engine = DeidEngine::new(DeidConfig::default())?;
//! let body = br#"{"resourceType":"Bundle","type":"batch","entry":[]}"#;
//! match engine.mutate_request("Bundle", body)? {
//!     RequestMutation::Rewritten { summary, .. } => assert_eq!(summary.entries, 0),
//!     RequestMutation::PassThrough => unreachable!(),
//! }
//! # Ok::<(), fhir_deid::domain::DeidError>(())
//! ```

pub mod audit;
pub mod codec;
pub mod config;
pub mod engine;
pub mod gate;
pub mod identifier;
pub mod processor;
pub mod pseudonym;
pub mod reference;
pub mod report;
pub mod rules;

// Re-export main types
pub use config::{AuditConfig, DeidConfig};
pub use engine::{DeidEngine, RequestMutation};
pub use pseudonym::{HashAlgorithm, Pseudonymizer};
pub use reference::ReferencePolicy;
pub use report::DeidSummary;
pub use rules::{rule_for, ResourceRule};
