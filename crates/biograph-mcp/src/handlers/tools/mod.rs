//! MCP tool call handlers.
//!
//! Every tool failure becomes an `isError: true` text payload carrying the
//! core error code, never a protocol-level failure; protocol errors are
//! reserved for malformed requests and unknown methods or tools.
//!
//! # Module organization
//!
//! - `dispatch` - handle_tools_list / handle_tools_call routing
//! - `helpers` - MCP result/error payload helpers and argument parsing
//! - `resolution` - get_schema, find_common_nodes
//! - `enrichment` - enrich_entities, enrich_genes, compare_gene_sets
//! - `mechanism` - find_drug_disease_mechanisms
//! - `analysis` - PrimeKG anatomy/pathway/drug analysis tools
//! - `geo` - disease prevalence and SDoH tools

mod analysis;
mod dispatch;
mod enrichment;
mod geo;
mod helpers;
mod mechanism;
mod resolution;

// All implementations are impl blocks on the Handlers struct; nothing to
// re-export.
