//! Tool dispatch: tools/list and tools/call routing.

use serde_json::{json, Value};
use tracing::debug;

use crate::protocol::{error_codes, JsonRpcId, JsonRpcResponse};
use crate::tools::{get_tool_definitions, names};

use super::super::Handlers;

impl Handlers {
    /// Handle tools/list request.
    pub(in crate::handlers) async fn handle_tools_list(
        &self,
        id: Option<JsonRpcId>,
    ) -> JsonRpcResponse {
        let tools = get_tool_definitions();
        debug!("Listing {} tools", tools.len());
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    /// Handle tools/call request.
    pub(in crate::handlers) async fn handle_tools_call(
        &self,
        id: Option<JsonRpcId>,
        params: Option<Value>,
    ) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing params");
        };
        let Some(name) = params.get("name").and_then(Value::as_str) else {
            return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing tool name");
        };
        let args = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));
        debug!("Calling tool: {}", name);

        match name {
            names::GET_SCHEMA => self.call_get_schema(id).await,
            names::FIND_COMMON_NODES => self.call_find_common_nodes(id, args).await,
            names::ENRICH_ENTITIES => self.call_enrich_entities(id, args).await,
            names::ENRICH_GENES => self.call_enrich_genes(id, args).await,
            names::COMPARE_GENE_SETS => self.call_compare_gene_sets(id, args).await,
            names::FIND_DRUG_DISEASE_MECHANISMS => {
                self.call_find_drug_disease_mechanisms(id, args).await
            }
            names::FIND_GENES_IN_ANATOMY => self.call_find_genes_in_anatomy(id, args).await,
            names::FIND_DISEASE_PATHWAYS => self.call_find_disease_pathways(id, args).await,
            names::FIND_DRUGS_FOR_PATHWAY => self.call_find_drugs_for_pathway(id, args).await,
            names::FIND_COMMON_PATHWAYS_ACROSS_DISEASES => {
                self.call_find_common_pathways_across_diseases(id, args).await
            }
            names::FIND_DISEASE_PREVALENCE => self.call_find_disease_prevalence(id, args).await,
            names::FIND_SDOH_BY_LOCATION => self.call_find_sdoh_by_location(id, args).await,
            other => JsonRpcResponse::error(
                id,
                error_codes::TOOL_NOT_FOUND,
                format!("Unknown tool: {other}"),
            ),
        }
    }
}
