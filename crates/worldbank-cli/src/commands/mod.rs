// Module exports for CLI subcommands
//
// `mcp` runs the stdio server; `query` answers one resource read or tool call
// and exits. Both build their state through `load_state`.

pub mod mcp;
pub mod query;

use std::time::Instant;

use anyhow::{Context, Result};
use worldbank_lib::{resolve_dataset_path, UpstreamConfig};
use worldbank_mcp::McpServerState;

use crate::GlobalOptions;

/// Configure tracing to write only to stderr.
///
/// Stdout is reserved for protocol messages and command output. Without an
/// explicit level, `RUST_LOG` applies and then `default_level`.
pub fn configure_tracing(log_level: Option<&str>, default_level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = if let Some(level) = log_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let subscriber = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    Ok(())
}

/// Resolve the dataset and upstream configuration and build the handler state.
pub fn load_state(global: &GlobalOptions) -> Result<McpServerState> {
    let path = resolve_dataset_path(global.data_file.as_deref());
    let config = UpstreamConfig::from_env();
    tracing::info!("Using dataset path {}", path.display());

    let start = Instant::now();
    let state = McpServerState::with_path(&path, &config).with_context(|| {
        format!(
            "Failed to initialize server state from dataset {}",
            path.display()
        )
    })?;
    tracing::info!("Dataset loaded in {:?}", start.elapsed());

    Ok(state)
}
