//! MCP tool catalog: names, definitions, and the shared definition type.

pub mod definitions;
pub mod names;
pub mod types;

pub use definitions::get_tool_definitions;
pub use types::ToolDefinition;
