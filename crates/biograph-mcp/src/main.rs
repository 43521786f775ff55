//! Biograph MCP server binary.
//!
//! Reads newline-delimited JSON-RPC 2.0 from stdin and writes responses to
//! stdout; logging goes to stderr so it never corrupts the transport.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use biograph_core::Config;
use biograph_mcp::server::McpServer;

/// Cross-graph biomedical knowledge integration MCP server
#[derive(Parser)]
#[command(name = "biograph-mcp")]
#[command(version)]
#[command(about = "MCP server for cross-graph biomedical knowledge integration")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().context("reading BIOGRAPH_* configuration")?;
    let server = McpServer::new(config)?;
    server.run().await
}
