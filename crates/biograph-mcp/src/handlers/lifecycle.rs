//! MCP lifecycle handlers.

use serde_json::json;
use tracing::info;

use crate::protocol::{JsonRpcId, JsonRpcResponse};

use super::Handlers;

impl Handlers {
    /// Handle MCP initialize request.
    ///
    /// Returns server capabilities following the MCP 2024-11-05 protocol
    /// specification. The handshake response must be strict JSON-RPC 2.0
    /// with no extension fields.
    pub(super) async fn handle_initialize(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        info!("Handling initialize request");

        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": { "listChanged": true }
                },
                "serverInfo": {
                    "name": "biograph-mcp",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    /// Handle notifications/initialized.
    ///
    /// Notifications don't require a response per JSON-RPC 2.0; the empty
    /// marker tells the server loop to write nothing.
    pub(super) fn handle_initialized_notification(&self) -> JsonRpcResponse {
        info!("Client initialized notification received");
        JsonRpcResponse::empty()
    }

    /// Handle MCP shutdown request.
    pub(super) async fn handle_shutdown(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        info!("Handling shutdown request");
        JsonRpcResponse::success(id, json!(null))
    }
}
