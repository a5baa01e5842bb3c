//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod batch;
pub mod deidentify;
pub mod init;
pub mod rules;
pub mod validate;
