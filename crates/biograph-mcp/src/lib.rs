//! Biograph MCP server library.
//!
//! JSON-RPC 2.0 server implementing the Model Context Protocol (MCP) over
//! newline-delimited stdio. Exposes the cross-graph integration operations
//! of `biograph-core` as MCP tools: entity resolution, multi-hop enrichment,
//! drug-disease mechanism composition, gene-set comparison, and the
//! PrimeKG/triple-store analysis queries.
//!
//! The handlers and protocol types are public for integration testing.

pub mod backends;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
