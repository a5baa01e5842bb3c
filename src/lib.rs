// fhir-deid - FHIR Bundle De-identification Tool
// Copyright (c) 2025 fhir-deid Contributors
// Licensed under the MIT License

//! # fhir-deid - FHIR Bundle De-identification
//!
//! fhir-deid rewrites FHIR Bundles so that no resource keeps its original
//! identity while every reference between resources still resolves.
//!
//! ## Overview
//!
//! For every entry of a Bundle the engine:
//! - **Pseudonymizes** the entry's `fullUrl` and the resource's `id` with a
//!   deterministic one-way hash
//! - **Rewrites** every reference the resource type is known to carry, so
//!   `Encounter/123` becomes `Encounter/<pseudonym of 123>` wherever it appears
//! - **Clears** display labels on references and the directly identifying
//!   members of Patient resources
//!
//! Pseudonyms are recomputed from the raw identifier each time; no mapping
//! table is kept, so the same identifier yields the same pseudonym across
//! entries, documents and processes.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`deid`] - De-identification engine (gate, rules, rewriting, audit)
//! - [`domain`] - Bundle model, resource types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use fhir_deid::deid::{DeidConfig, DeidEngine, Pseudonymizer, RequestMutation};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DeidEngine::new(DeidConfig::default())?;
//!
//! let body = br#"{
//!     "resourceType": "Bundle",
//!     "type": "transaction",
//!     "entry": [
//!         {"resource": {"resourceType": "Condition",
//!                       "encounter": {"reference": "Encounter/123"}}},
//!         {"resource": {"resourceType": "Encounter", "id": "123"}}
//!     ]
//! }"#;
//!
//! if let RequestMutation::Rewritten { body, summary } = engine.mutate_request("Bundle", body)? {
//!     let bundle: serde_json::Value = serde_json::from_slice(&body)?;
//!     let pseudonym = Pseudonymizer::default().pseudonymize("123");
//!     assert_eq!(
//!         bundle["entry"][0]["resource"]["encounter"]["reference"],
//!         format!("Encounter/{pseudonym}")
//!     );
//!     assert_eq!(summary.references_rewritten, 1);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! The engine reports failures through [`domain::DeidError`]. A request
//! either succeeds for every entry or fails as a whole; no partial output is
//! produced.
//!
//! ## Logging
//!
//! fhir-deid uses structured logging with the `tracing` crate. Log records
//! carry counts, resource types and request paths, never identifiers.

pub mod cli;
pub mod config;
pub mod deid;
pub mod domain;
pub mod logging;
