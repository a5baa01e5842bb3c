//! Batch command implementation
//!
//! De-identifies every `*.json` document of a directory concurrently. Each
//! document is processed on the blocking pool; the number of documents in
//! flight is bounded by `--concurrency`.

use crate::config::load_config_or_default;
use crate::deid::{DeidEngine, DeidSummary, RequestMutation};
use crate::domain::{DeidError, BUNDLE_RESOURCE_TYPE};
use crate::{log_document_processed, log_error_with_context};
use anyhow::Context;
use clap::Args;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory containing Bundle documents (`*.json`)
    #[arg(short, long)]
    pub input_dir: PathBuf,

    /// Directory receiving the de-identified documents
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Maximum number of documents processed at once
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Documents written to the output directory
    pub processed: usize,

    /// Documents that failed, with the error
    pub failed: Vec<(PathBuf, DeidError)>,

    /// Counts merged across all processed documents
    pub summary: DeidSummary,

    /// Wall-clock duration (ms)
    pub duration_ms: u64,
}

impl BatchReport {
    /// Exit code for the run: 0 when everything succeeded, 3 when only
    /// input problems occurred, 5 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.failed.is_empty() {
            0
        } else if self
            .failed
            .iter()
            .all(|(_, e)| matches!(e, DeidError::Parse(_) | DeidError::Io(_)))
        {
            3
        } else {
            5
        }
    }
}

impl BatchArgs {
    /// Execute the batch command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(
            input_dir = %self.input_dir.display(),
            output_dir = %self.output_dir.display(),
            concurrency = self.concurrency,
            "Starting batch command"
        );

        println!("🚀 De-identifying documents in {}", self.input_dir.display());

        let config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let engine = match DeidEngine::new(config.engine) {
            Ok(engine) => Arc::new(engine),
            Err(e) => {
                log_error_with_context!(&e, "Failed to initialize engine");
                println!("❌ Failed to initialize engine: {e}");
                return Ok(2);
            }
        };

        if !self.input_dir.is_dir() {
            println!("❌ Input directory not found: {}", self.input_dir.display());
            return Ok(3);
        }

        let report = run_batch(engine, &self.input_dir, &self.output_dir, self.concurrency).await?;

        println!();
        println!("{}", report.summary);
        println!("Documents processed: {}", report.processed);
        println!("Documents failed:    {}", report.failed.len());
        println!("Total time:          {}ms", report.duration_ms);

        for (path, error) in &report.failed {
            println!("  ❌ {}: {}", path.display(), error);
        }

        if report.failed.is_empty() {
            println!("✅ Batch completed successfully");
        } else {
            println!("⚠️  Batch completed with errors");
        }

        Ok(report.exit_code())
    }
}

/// De-identify every `*.json` file of `input_dir` into `output_dir`
///
/// A failing document does not stop the others; it is reported in
/// [`BatchReport::failed`] and nothing is written for it.
pub async fn run_batch(
    engine: Arc<DeidEngine>,
    input_dir: &Path,
    output_dir: &Path,
    concurrency: usize,
) -> anyhow::Result<BatchReport> {
    let start = Instant::now();

    let files = collect_documents(input_dir)
        .with_context(|| format!("Failed to list {}", input_dir.display()))?;
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    tracing::info!(documents = files.len(), "Processing batch");

    let results: Vec<_> = stream::iter(files)
        .map(|path| {
            let engine = Arc::clone(&engine);
            let output_dir = output_dir.to_path_buf();
            async move {
                let task_path = path.clone();
                let result = tokio::task::spawn_blocking(move || {
                    process_file(&engine, &task_path, &output_dir)
                })
                .await;
                (path, result)
            }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut report = BatchReport::default();
    for (path, result) in results {
        match result {
            Ok(Ok(summary)) => {
                log_document_processed!(path.display(), summary);
                report.processed += 1;
                report.summary.merge(&summary);
            }
            Ok(Err(e)) => {
                log_error_with_context!(&e, format!("Failed to de-identify {}", path.display()));
                report.failed.push((path, e));
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Document task failed");
                report
                    .failed
                    .push((path, DeidError::Io(format!("Task failed: {e}"))));
            }
        }
    }

    report.duration_ms = start.elapsed().as_millis() as u64;
    Ok(report)
}

/// Every `*.json` file directly inside `dir`, sorted by name
fn collect_documents(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn process_file(
    engine: &DeidEngine,
    path: &Path,
    output_dir: &Path,
) -> Result<DeidSummary, DeidError> {
    let input = std::fs::read(path)?;

    let (body, summary) = match engine.mutate_request(BUNDLE_RESOURCE_TYPE, &input)? {
        RequestMutation::Rewritten { body, summary } => (body, summary),
        RequestMutation::PassThrough => (input, DeidSummary::new()),
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| DeidError::Io(format!("Not a file: {}", path.display())))?;
    std::fs::write(output_dir.join(file_name), body)?;

    Ok(summary)
}
