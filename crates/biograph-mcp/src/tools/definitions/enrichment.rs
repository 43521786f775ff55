//! Enrichment and gene-set comparison tool definitions.

use serde_json::json;

use crate::tools::names;
use crate::tools::types::ToolDefinition;

use super::core::entities_schema;

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            names::ENRICH_ENTITIES,
            "Find entities related to the given ones through PrimeKG relation \
             channels, up to three hops. Depth 2 and 3 expand through disease, \
             pathway, anatomy, and gene frontiers.",
            json!({
                "type": "object",
                "properties": {
                    "entities": entities_schema(),
                    "depth": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 3,
                        "default": 1,
                        "description": "Traversal depth in hops"
                    }
                },
                "required": ["entities"],
                "additionalProperties": false
            }),
        ),
        ToolDefinition::new(
            names::ENRICH_GENES,
            "Single-hop gene enrichment with per-channel toggles: drugs, diseases, \
             pathways, GO terms, and anatomical expression. Disabled channels are \
             not queried at all.",
            json!({
                "type": "object",
                "properties": {
                    "gene_names": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Gene symbols (e.g. TP53, BRCA1)"
                    },
                    "include_drugs": { "type": "boolean", "default": true },
                    "include_diseases": { "type": "boolean", "default": true },
                    "include_pathways": { "type": "boolean", "default": true },
                    "include_go_terms": { "type": "boolean", "default": true },
                    "include_anatomy": { "type": "boolean", "default": true }
                },
                "required": ["gene_names"],
                "additionalProperties": false
            }),
        ),
        ToolDefinition::new(
            names::COMPARE_GENE_SETS,
            "Compare two gene sets: overlap, uniques, Jaccard index, and the \
             pathways, diseases, and anatomies reached by at least one gene from \
             each set.",
            json!({
                "type": "object",
                "properties": {
                    "set1": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "First gene symbol set"
                    },
                    "set2": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Second gene symbol set"
                    },
                    "set1_name": { "type": "string", "default": "set1" },
                    "set2_name": { "type": "string", "default": "set2" }
                },
                "required": ["set1", "set2"],
                "additionalProperties": false
            }),
        ),
    ]
}
