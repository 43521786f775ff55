//! Geospatial and social-determinants tool definitions.

use serde_json::json;

use crate::tools::names;
use crate::tools::types::ToolDefinition;

pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            names::FIND_DISEASE_PREVALENCE,
            "Disease prevalence observations by administrative location, newest \
             first. Both filters are case-insensitive substring matches.",
            json!({
                "type": "object",
                "properties": {
                    "disease_name": {
                        "type": "string",
                        "description": "Disease name filter"
                    },
                    "location": {
                        "type": "string",
                        "description": "Location name filter"
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 500,
                        "default": 50
                    }
                },
                "required": ["disease_name", "location"],
                "additionalProperties": false
            }),
        ),
        ToolDefinition::new(
            names::FIND_SDOH_BY_LOCATION,
            "Social-determinants-of-health observations for a location, newest \
             first. The location filter is a case-insensitive substring match.",
            json!({
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "Location name filter"
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": 500,
                        "default": 50
                    }
                },
                "required": ["location"],
                "additionalProperties": false
            }),
        ),
    ]
}
