use anyhow::{Context, Result};
use serde_json::Value;
use tokio::io::{stdin, stdout, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::select;
use tokio::signal;
use worldbank_mcp::protocol::{handle_message, parse_error_response};
use worldbank_mcp::McpServerState;

use super::{configure_tracing, load_state};
use crate::GlobalOptions;

/// Stdio transport using tokio async I/O.
///
/// One JSON-RPC message per line in each direction.
pub struct StdioTransport {
    reader: BufReader<tokio::io::Stdin>,
    writer: tokio::io::Stdout,
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(stdin()),
            writer: stdout(),
        }
    }

    /// Read a single raw line. Returns Ok(None) on EOF.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let bytes = self
            .reader
            .read_line(&mut line)
            .await
            .context("failed to read line")?;
        if bytes == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    // Keep BrokenPipe as an io::Error so the loop can recognise a client disconnect
    fn check_io<T>(res: std::io::Result<T>) -> Result<T> {
        match res {
            Ok(v) => Ok(v),
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "Client disconnected",
            )
            .into()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn write_message(&mut self, msg: &Value) -> Result<()> {
        let s = serde_json::to_string(msg)?;

        Self::check_io(self.writer.write_all(s.as_bytes()).await)?;
        Self::check_io(self.writer.write_all(b"\n").await)?;
        Self::check_io(self.writer.flush().await)?;

        Ok(())
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .map(|ioe| ioe.kind() == std::io::ErrorKind::BrokenPipe)
        .unwrap_or(false)
}

/// Run the server loop: read messages from stdin and respond on stdout.
pub async fn run_server_loop(mut transport: StdioTransport, server: McpServerState) -> Result<()> {
    server.initialize();
    tracing::info!("MCP server initialized, waiting for requests...");

    loop {
        select! {
            _ = signal::ctrl_c() => {
                tracing::info!("Received shutdown signal, exiting gracefully");
                break;
            }

            line = transport.read_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        tracing::info!("Client disconnected (EOF)");
                        break;
                    }
                    Err(e) => {
                        tracing::error!("Transport error: {}", e);
                        return Err(e);
                    }
                };

                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let reply = match serde_json::from_str::<Value>(trimmed) {
                    Ok(message) => handle_message(&server, &message).await,
                    Err(e) => {
                        tracing::warn!("Discarding undecodable message: {}", e);
                        Some(parse_error_response(e.to_string()))
                    }
                };

                if let Some(response) = reply {
                    if let Err(e) = transport.write_message(&response).await {
                        if is_broken_pipe(&e) {
                            tracing::info!("Client disconnected (broken pipe)");
                            break;
                        }
                        return Err(e);
                    }
                }
            }
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Public entrypoint orchestrating the MCP server lifecycle
pub async fn run_mcp_server(global: &GlobalOptions) -> Result<()> {
    configure_tracing(global.log_level.as_deref(), "info")?;

    let server = load_state(global)?;

    let transport = StdioTransport::new();
    run_server_loop(transport, server).await
}
