//! Configuration management for fhir-deid.
//!
//! TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FHIR_DEID_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`DeidConfig`](crate::deid::DeidConfig) - Engine settings (hash, reference policy, audit)
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [engine]
//! hash_algorithm = "sha256"
//! reference_policy = "pseudonymize"
//!
//! [engine.audit]
//! enabled = true
//! log_path = "${FHIR_DEID_AUDIT_DIR}/deidentification.log"
//!
//! [logging]
//! local_enabled = false
//! ```
//!
//! # Validation
//!
//! ```rust,no_run
//! use fhir_deid::config::load_config;
//!
//! match load_config("fhir-deid.toml") {
//!     Ok(config) => println!("Policy: {}", config.engine.reference_policy),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str, load_config_or_default};
pub use schema::{ApplicationConfig, FhirDeidConfig, LoggingConfig};
