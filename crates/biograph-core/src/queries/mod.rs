//! Query template catalog for both graph backends.
//!
//! Pure data plus string rendering. Labels and keys interpolated into
//! query text come exclusively from the [`crate::registry::EntityRegistry`]
//! table, never from caller input; caller values travel as bound parameters
//! (Cypher) or validated substitutions (SPARQL).

pub mod cypher;
pub mod sparql;
