//! MCP tool result and request-parsing helpers.

use serde::de::DeserializeOwned;
use serde_json::json;

use biograph_core::IntegrationError;

use crate::protocol::{JsonRpcId, JsonRpcResponse};

use super::super::Handlers;

impl Handlers {
    /// MCP-compliant tool result helper.
    ///
    /// Wraps tool output in the required MCP format:
    /// ```json
    /// {
    ///   "content": [{"type": "text", "text": "..."}],
    ///   "isError": false
    /// }
    /// ```
    pub(crate) fn tool_result(
        &self,
        id: Option<JsonRpcId>,
        data: impl serde::Serialize,
    ) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": serde_json::to_string(&data).unwrap_or_else(|_| "{}".to_string())
                }],
                "isError": false
            }),
        )
    }

    /// MCP-compliant tool error helper for caller mistakes spotted before
    /// any component ran.
    pub(crate) fn tool_error(&self, id: Option<JsonRpcId>, message: &str) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": message
                }],
                "isError": true
            }),
        )
    }

    /// Convert a core error into an MCP tool error payload carrying its
    /// JSON-RPC code. Tool failures are success responses with
    /// `isError: true` per the MCP spec, never protocol errors.
    pub(crate) fn tool_failure(
        &self,
        id: Option<JsonRpcId>,
        tool_name: &str,
        err: &IntegrationError,
    ) -> JsonRpcResponse {
        tracing::error!("[{}] Tool call failed: {}", tool_name, err);
        let code = err.error_code();
        JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": format!("[{code}] {err}")
                }],
                "isError": true,
                "errorCode": code
            }),
        )
    }

    /// Parse JSON args into a typed DTO.
    ///
    /// Returns `Ok(request)` on success, or an MCP error `JsonRpcResponse`
    /// on parse failure.
    #[allow(clippy::result_large_err)]
    pub(crate) fn parse_args<T: DeserializeOwned>(
        &self,
        id: Option<JsonRpcId>,
        args: serde_json::Value,
        tool_name: &str,
    ) -> Result<T, JsonRpcResponse> {
        serde_json::from_value(args).map_err(|e| {
            tracing::error!("[{}] Invalid request: {}", tool_name, e);
            self.tool_error(id, &format!("Invalid request: {e}"))
        })
    }
}
