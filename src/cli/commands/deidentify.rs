//! Deidentify command implementation
//!
//! Runs the engine on one document read from a file or stdin and writes the
//! result to a file or stdout. Status lines go to stderr so stdout can carry
//! the document.

use crate::config::load_config_or_default;
use crate::deid::{DeidEngine, ReferencePolicy, RequestMutation};
use crate::domain::{DeidError, BUNDLE_RESOURCE_TYPE};
use crate::{log_document_processed, log_error_with_context};
use clap::Args;
use std::io::{Read, Write};
use std::path::Path;

/// Marker for stdin/stdout
const STDIO: &str = "-";

/// Arguments for the deidentify command
#[derive(Args, Debug)]
pub struct DeidentifyArgs {
    /// Input Bundle file (`-` for stdin)
    #[arg(short, long, default_value = STDIO)]
    pub input: String,

    /// Output file (`-` for stdout)
    #[arg(short, long, default_value = STDIO)]
    pub output: String,

    /// Request path the document was submitted to (empty or `Bundle` to rewrite)
    #[arg(long, default_value = BUNDLE_RESOURCE_TYPE)]
    pub request_path: String,

    /// Override the configured reference policy (pseudonymize or display_only)
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<String>,

    /// Pretty-print the output document
    #[arg(long)]
    pub pretty: bool,

    /// Print the de-identification summary to stderr
    #[arg(long)]
    pub summary: bool,
}

impl DeidentifyArgs {
    /// Execute the deidentify command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(
            input = %self.input,
            request_path = %self.request_path,
            "Starting deidentify command"
        );

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Some(policy) = &self.policy {
            config.engine.reference_policy = match policy.parse::<ReferencePolicy>() {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("❌ Invalid --policy: {e}");
                    return Ok(2);
                }
            };
            tracing::info!(policy = %config.engine.reference_policy, "Overriding reference policy from CLI");
        }

        let engine = match DeidEngine::new(config.engine) {
            Ok(engine) => engine.with_pretty_output(self.pretty),
            Err(e) => {
                log_error_with_context!(&e, "Failed to initialize engine");
                eprintln!("❌ Failed to initialize engine: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let input = match read_input(&self.input) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("❌ Failed to read input {}: {e}", self.input);
                return Ok(3);
            }
        };

        let output = match engine.mutate_request(&self.request_path, &input) {
            Ok(RequestMutation::PassThrough) => {
                eprintln!(
                    "ℹ️  Request path '{}' is not a Bundle submission; document passed through",
                    self.request_path
                );
                input
            }
            Ok(RequestMutation::Rewritten { body, summary }) => {
                log_document_processed!(self.input, summary);
                if self.summary {
                    eprintln!("{summary}");
                }
                body
            }
            Err(e) => {
                log_error_with_context!(&e, "De-identification failed");
                eprintln!("❌ De-identification failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if let Err(e) = write_output(&self.output, &output) {
            eprintln!("❌ Failed to write output {}: {e}", self.output);
            return Ok(5);
        }

        if self.output != STDIO {
            eprintln!("✅ De-identified document written to {}", self.output);
        }

        Ok(0)
    }
}

/// Map an engine error to a process exit code
pub(crate) fn exit_code_for(error: &DeidError) -> i32 {
    match error {
        DeidError::Configuration(_) | DeidError::HashUnavailable(_) => 2,
        DeidError::Parse(_) | DeidError::Io(_) => 3,
        DeidError::Serialization(_) | DeidError::Audit(_) => 5,
    }
}

fn read_input(input: &str) -> std::io::Result<Vec<u8>> {
    if input == STDIO {
        let mut buffer = Vec::new();
        std::io::stdin().read_to_end(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read(Path::new(input))
    }
}

fn write_output(output: &str, bytes: &[u8]) -> std::io::Result<()> {
    if output == STDIO {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(bytes)?;
        stdout.write_all(b"\n")?;
        stdout.flush()
    } else {
        if let Some(parent) = Path::new(output).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(output, bytes)
    }
}
