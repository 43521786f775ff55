//! Drug-disease mechanism tool definitions.

use serde_json::json;

use crate::tools::names;
use crate::tools::types::ToolDefinition;

pub fn definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition::new(
        names::FIND_DRUG_DISEASE_MECHANISMS,
        "Compose mechanistic evidence linking a drug to a disease: direct \
         indication, shared gene targets, connecting pathways, and shared \
         anatomical expression, merged into one report with an evidence score \
         in [0, 1].",
        json!({
            "type": "object",
            "properties": {
                "drug": {
                    "type": "string",
                    "description": "Drug name or DrugBank ID (DB + five digits)"
                },
                "disease": {
                    "type": "string",
                    "description": "Disease name or MONDO ID"
                },
                "include_direct": { "type": "boolean", "default": true },
                "include_gene_targets": { "type": "boolean", "default": true },
                "include_pathways": { "type": "boolean", "default": true },
                "include_anatomy": { "type": "boolean", "default": true }
            },
            "required": ["drug", "disease"],
            "additionalProperties": false
        }),
    )]
}
