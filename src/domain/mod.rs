//! Domain models and types for fhir-deid.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Document model** ([`Bundle`], [`BundleEntry`], [`Resource`])
//! - **Closed resource type set** ([`ResourceType`])
//! - **Error types** ([`DeidError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, DeidError>`]:
//!
//! ```rust
//! use fhir_deid::domain::{Bundle, DeidError, Result};
//!
//! fn parse(bytes: &[u8]) -> Result<Bundle> {
//!     // serde_json errors convert automatically using the ? operator
//!     Ok(serde_json::from_slice(bytes)?)
//! }
//! ```

pub mod bundle;
pub mod errors;
pub mod resource_type;
pub mod result;

// Re-export commonly used types for convenience
pub use bundle::{Bundle, BundleEntry, Resource, BUNDLE_RESOURCE_TYPE};
pub use errors::DeidError;
pub use resource_type::ResourceType;
pub use result::Result;
