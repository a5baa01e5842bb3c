//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "fhir-deid.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing fhir-deid configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Validate configuration: fhir-deid validate-config");
                println!("  3. De-identify a Bundle: fhir-deid deidentify --input bundle.json");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# fhir-deid Configuration File

[application]
log_level = "info"

[engine]
hash_algorithm = "sha256"
reference_policy = "pseudonymize"

[engine.audit]
enabled = false
log_path = "./audit/deidentification.log"
json_format = true

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# fhir-deid Configuration File
#
# Every setting has a default; delete what you do not need.
#
# Values can reference environment variables with ${VAR_NAME}, for example:
#   log_path = "${FHIR_DEID_AUDIT_DIR}/deidentification.log"
#
# Any setting can also be overridden with FHIR_DEID_<SECTION>_<KEY>, for example:
#   FHIR_DEID_ENGINE_REFERENCE_POLICY=display_only

[application]
# Log level: trace | debug | info | warn | error
log_level = "info"

[engine]
# Hash used to derive pseudonyms: sha256 | sha512_256
# Changing it changes every pseudonym; keep it fixed across runs that must link.
hash_algorithm = "sha256"

# How references between resources are treated:
#   pseudonymize - rewrite the target to "<Type>/<pseudonym>" and drop the display label
#   display_only - keep the target as is and only drop the display label
reference_policy = "pseudonymize"

[engine.audit]
# One line per de-identified document: counts and a SHA-256 of the output.
# No identifiers are written to the audit log.
enabled = false
log_path = "./audit/deidentification.log"
# JSON lines when true, plain text otherwise
json_format = true

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"
# Rotation: daily | hourly
local_rotation = "daily"
"#
        .to_string()
    }
}
