//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for fhir-deid using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// fhir-deid - FHIR Bundle de-identification
#[derive(Parser, Debug)]
#[command(name = "fhir-deid")]
#[command(version, about, long_about = None)]
#[command(author = "fhir-deid Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "fhir-deid.toml", env = "FHIR_DEID_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FHIR_DEID_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// De-identify one Bundle document
    Deidentify(commands::deidentify::DeidentifyArgs),

    /// De-identify every Bundle document in a directory
    Batch(commands::batch::BatchArgs),

    /// Show the resource rule registry
    Rules(commands::rules::RulesArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
