//! Audit logging module
//!
//! Records every rewritten document as one line: counts, request path and a
//! hash of the emitted body. Identifiers never reach the audit trail.

pub mod logger;

pub use logger::AuditLogger;
