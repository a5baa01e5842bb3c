//! Logging and observability
//!
//! Structured logging with configurable levels, console output and optional
//! JSON file logging with rotation. Log records carry counts, resource types
//! and request paths, never identifiers.
//!
//! # Example
//!
//! ```no_run
//! use fhir_deid::logging::init_logging;
//! use fhir_deid::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the outcome of one de-identified document
///
/// # Example
///
/// ```no_run
/// use fhir_deid::log_document_processed;
/// use fhir_deid::deid::DeidSummary;
///
/// let summary = DeidSummary::new();
/// log_document_processed!("bundle.json", &summary);
/// ```
#[macro_export]
macro_rules! log_document_processed {
    ($source:expr, $summary:expr) => {
        tracing::info!(
            source = %$source,
            entries = $summary.entries,
            references_rewritten = $summary.references_rewritten,
            fields_cleared = $summary.fields_cleared,
            unhandled = $summary.total_unhandled(),
            duration_ms = $summary.processing_time_ms,
            "Document de-identified"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use fhir_deid::log_error_with_context;
/// use fhir_deid::domain::DeidError;
///
/// let error = DeidError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = %$context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::deid::DeidSummary;
    use crate::domain::DeidError;

    #[test]
    fn test_macros_expand() {
        let summary = DeidSummary::new();
        log_document_processed!("bundle.json", &summary);

        let error = DeidError::Parse("bad body".to_string());
        log_error_with_context!(&error, "Failed to parse input");
    }
}
