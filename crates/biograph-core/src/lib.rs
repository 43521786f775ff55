//! Cross-graph biomedical knowledge integration core.
//!
//! This crate resolves heterogeneous entity identifiers (gene symbols,
//! MONDO/UBERON/Reactome/DrugBank/GO IDs) across two independently curated
//! knowledge graphs, a property graph ("PrimeKG") and a triple store
//! ("GeneLab"), and composes multi-hop traversals into unified answers:
//!
//! - [`resolver::CrossGraphResolver`]: which identifiers exist in which graph
//! - [`enrich::EnrichmentEngine`]: related entities at a configurable hop depth
//! - [`mechanism::MechanismComposer`]: drug-disease mechanistic evidence
//! - [`compare::SetComparator`]: identifier-set overlap plus shared annotations
//!
//! The graph engines themselves are external; this crate talks to them only
//! through the [`backend::PropertyGraph`] and [`backend::TripleStore`] seams.

pub mod backend;
pub mod compare;
pub mod config;
pub mod enrich;
pub mod error;
pub mod mechanism;
pub mod normalize;
pub mod queries;
pub mod registry;
pub mod resolver;
pub mod testing;

pub use backend::{GraphSource, PropertyGraph, Row, TripleStore};
pub use compare::SetComparator;
pub use config::{Config, TypePolicy};
pub use enrich::{EnrichmentEngine, GeneChannels, HopDepth};
pub use error::{BackendError, ConfigError, IntegrationError, Result};
pub use mechanism::{MechanismComposer, MechanismOptions};
pub use registry::{EntityRegistry, EntityType};
pub use resolver::CrossGraphResolver;
