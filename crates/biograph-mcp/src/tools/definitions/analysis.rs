//! PrimeKG analysis tool definitions.

use serde_json::json;

use crate::tools::names;
use crate::tools::types::ToolDefinition;

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            names::FIND_GENES_IN_ANATOMY,
            "Genes expressed (or explicitly absent) in anatomical locations, \
             grouped per location with gene counts.",
            json!({
                "type": "object",
                "properties": {
                    "anatomy_ids": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "UBERON IDs or anatomy names"
                    },
                    "expression": {
                        "type": "string",
                        "enum": ["present", "absent"],
                        "default": "present"
                    }
                },
                "required": ["anatomy_ids"],
                "additionalProperties": false
            }),
        ),
        ToolDefinition::new(
            names::FIND_DISEASE_PATHWAYS,
            "Pathways associated with diseases through connecting genes, filtered \
             by a minimum connecting-gene count.",
            json!({
                "type": "object",
                "properties": {
                    "disease_ids": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "MONDO IDs or disease names"
                    },
                    "min_genes": {
                        "type": "integer",
                        "minimum": 1,
                        "default": 2,
                        "description": "Minimum genes connecting a disease to a pathway"
                    }
                },
                "required": ["disease_ids"],
                "additionalProperties": false
            }),
        ),
        ToolDefinition::new(
            names::FIND_DRUGS_FOR_PATHWAY,
            "Drugs targeting genes inside the given pathways, ranked by how many \
             pathway genes each drug targets.",
            json!({
                "type": "object",
                "properties": {
                    "pathway_ids": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Reactome IDs or pathway names"
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 200,
                        "default": 25
                    }
                },
                "required": ["pathway_ids"],
                "additionalProperties": false
            }),
        ),
        ToolDefinition::new(
            names::FIND_COMMON_PATHWAYS_ACROSS_DISEASES,
            "Pathways shared across multiple diseases, with the connecting genes, \
             filtered by a minimum disease count.",
            json!({
                "type": "object",
                "properties": {
                    "disease_ids": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "MONDO IDs or disease names"
                    },
                    "min_diseases": {
                        "type": "integer",
                        "minimum": 2,
                        "default": 2
                    }
                },
                "required": ["disease_ids"],
                "additionalProperties": false
            }),
        ),
    ]
}
