//! Tool definitions grouped by domain.

mod analysis;
mod core;
mod enrichment;
mod geo;
mod mechanism;

use super::types::ToolDefinition;

/// Returns all tool definitions for tools/list.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    let mut tools = Vec::new();
    tools.extend(core::definitions());
    tools.extend(enrichment::definitions());
    tools.extend(mechanism::definitions());
    tools.extend(analysis::definitions());
    tools.extend(geo::definitions());
    tools
}
