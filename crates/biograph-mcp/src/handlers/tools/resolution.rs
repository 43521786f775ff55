//! Schema and cross-graph resolution tool handlers.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::protocol::{JsonRpcId, JsonRpcResponse};
use crate::tools::names;

use super::super::Handlers;

#[derive(Deserialize)]
struct FindCommonNodesRequest {
    entities: BTreeMap<String, Vec<String>>,
}

impl Handlers {
    /// get_schema: entity type table and identifier conventions.
    pub(super) async fn call_get_schema(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": self.registry.schema_text()
                }],
                "isError": false
            }),
        )
    }

    /// find_common_nodes: which identifiers exist in which graph.
    pub(super) async fn call_find_common_nodes(
        &self,
        id: Option<JsonRpcId>,
        args: Value,
    ) -> JsonRpcResponse {
        let req: FindCommonNodesRequest =
            match self.parse_args(id.clone(), args, names::FIND_COMMON_NODES) {
                Ok(req) => req,
                Err(resp) => return resp,
            };
        if req.entities.is_empty() {
            return self.tool_error(id, "entities must not be empty");
        }
        match self.resolver.resolve(&req.entities).await {
            Ok(result) => self.tool_result(id, result),
            Err(err) => self.tool_failure(id, names::FIND_COMMON_NODES, &err),
        }
    }
}
