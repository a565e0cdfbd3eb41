//! World Bank gateway CLI library.
//!
//! Hosts the subcommand handlers so `main.rs` stays focused on argument
//! parsing and so the handlers can be exercised from tests.

use std::path::PathBuf;

pub mod commands;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Explicit dataset file, overriding the environment and platform defaults.
    pub data_file: Option<PathBuf>,
    /// Tracing filter directive (e.g. `debug`, `worldbank_mcp=trace`).
    pub log_level: Option<String>,
}
