//! Schema and cross-graph resolution tool definitions.

use serde_json::json;

use crate::tools::names;
use crate::tools::types::ToolDefinition;

/// The shared `entities` parameter: identifier lists keyed by entity type
/// wire name.
pub(super) fn entities_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "description": "Identifier lists keyed by entity type: genes, diseases, \
                        anatomies, pathways, drugs, biological_processes, \
                        molecular_functions, cellular_components.",
        "additionalProperties": {
            "type": "array",
            "items": { "type": "string" }
        }
    })
}

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            names::GET_SCHEMA,
            "Get the PrimeKG-GeneLab integration schema: how each entity type is \
             labeled and keyed in each graph, with identifier formats.",
            json!({
                "type": "object",
                "properties": {},
                "required": [],
                "additionalProperties": false
            }),
        ),
        ToolDefinition::new(
            names::FIND_COMMON_NODES,
            "Resolve entity identifiers across both knowledge graphs. Returns a \
             four-way partition per entity type (found in both, PrimeKG only, \
             GeneLab only, not found) plus a mapping-rate summary.",
            json!({
                "type": "object",
                "properties": {
                    "entities": entities_schema()
                },
                "required": ["entities"],
                "additionalProperties": false
            }),
        ),
    ]
}
