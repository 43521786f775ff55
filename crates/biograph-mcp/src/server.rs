//! MCP server: stdio transport and request framing.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use biograph_core::{Config, EntityRegistry, PropertyGraph, TripleStore};

use crate::backends::{HttpPropertyGraph, SparqlHttpStore};
use crate::handlers::Handlers;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse};

/// Endpoint for the PrimeKG transactional HTTP API.
const PRIMEKG_URL_VAR: &str = "BIOGRAPH_PRIMEKG_URL";
/// Endpoint for the GeneLab SPARQL API.
const GENELAB_URL_VAR: &str = "BIOGRAPH_GENELAB_URL";

/// MCP server over newline-delimited JSON-RPC on stdio.
pub struct McpServer {
    handlers: Handlers,
}

impl McpServer {
    /// Create a server wired to the HTTP graph backends.
    ///
    /// # Errors
    ///
    /// Fails fast when either endpoint variable is unset or an HTTP client
    /// cannot be built; a server with no reachable backend configuration
    /// must not start.
    pub fn new(config: Config) -> Result<Self> {
        let primekg_url = std::env::var(PRIMEKG_URL_VAR)
            .with_context(|| format!("{PRIMEKG_URL_VAR} must point at the PrimeKG endpoint"))?;
        let genelab_url = std::env::var(GENELAB_URL_VAR)
            .with_context(|| format!("{GENELAB_URL_VAR} must point at the GeneLab endpoint"))?;

        // The HTTP client deadline sits above the per-query deadline, so
        // timeouts are reported by the query layer, not the socket.
        let http_timeout = config.query_timeout + Duration::from_secs(5);
        let primekg: Arc<dyn PropertyGraph> =
            Arc::new(HttpPropertyGraph::new(primekg_url, http_timeout)?);
        let genelab: Arc<dyn TripleStore> =
            Arc::new(SparqlHttpStore::new(genelab_url, http_timeout)?);
        info!("Connected backend adapters (PrimeKG HTTP, GeneLab SPARQL)");

        let registry = Arc::new(EntityRegistry::builtin());
        let handlers = Handlers::new(registry, primekg, genelab, config);
        Ok(Self { handlers })
    }

    /// Create a server over pre-built handlers. Used by tests to swap the
    /// HTTP adapters for scripted backends.
    pub fn with_handlers(handlers: Handlers) -> Self {
        Self { handlers }
    }

    /// Run the server, reading requests from stdin and writing responses
    /// to stdout.
    pub async fn run(&self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut stdout = stdout.lock();

        info!("Server ready, waiting for requests...");

        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    error!("Error reading stdin: {}", e);
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            let response = self.handle_request(&line).await;

            // Notifications get no response
            if response.id.is_none() && response.result.is_none() && response.error.is_none() {
                debug!("Notification handled, no response needed");
                continue;
            }

            let response_json = serde_json::to_string(&response)?;
            debug!("Sending: {}", response_json);

            // MCP requires newline-delimited JSON on stdout
            writeln!(stdout, "{}", response_json)?;
            stdout.flush()?;
        }

        info!("Server shutting down...");
        Ok(())
    }

    /// Handle a single JSON-RPC request line.
    async fn handle_request(&self, input: &str) -> JsonRpcResponse {
        let request: JsonRpcRequest = match serde_json::from_str(input) {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return JsonRpcResponse::error(
                    None,
                    crate::protocol::error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                );
            }
        };

        if request.jsonrpc != "2.0" {
            return JsonRpcResponse::error(
                request.id,
                crate::protocol::error_codes::INVALID_REQUEST,
                "Invalid JSON-RPC version",
            );
        }

        self.handlers.dispatch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biograph_core::testing::{FakePrimeKg, FakeTripleStore};

    fn server() -> McpServer {
        let handlers = Handlers::new(
            Arc::new(EntityRegistry::builtin()),
            Arc::new(FakePrimeKg::new()),
            Arc::new(FakeTripleStore::new()),
            Config::default(),
        );
        McpServer::with_handlers(handlers)
    }

    #[tokio::test]
    async fn malformed_json_is_a_parse_error() {
        let resp = server().handle_request("{not json").await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, crate::protocol::error_codes::PARSE_ERROR);
    }

    #[tokio::test]
    async fn wrong_version_is_an_invalid_request() {
        let resp = server()
            .handle_request(r#"{"jsonrpc":"1.0","id":1,"method":"initialize"}"#)
            .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, crate::protocol::error_codes::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn initialized_notification_returns_empty_marker() {
        let resp = server()
            .handle_request(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(resp.id.is_none() && resp.result.is_none() && resp.error.is_none());
    }
}
