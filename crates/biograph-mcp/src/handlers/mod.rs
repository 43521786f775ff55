//! JSON-RPC request handlers.
//!
//! One `Handlers` struct owns the integration components; per-domain impl
//! blocks in the submodules add the tool call handlers onto it.

mod dispatch;
mod lifecycle;
mod tools;

use std::sync::Arc;

use biograph_core::compare::SetComparator;
use biograph_core::enrich::EnrichmentEngine;
use biograph_core::mechanism::MechanismComposer;
use biograph_core::resolver::CrossGraphResolver;
use biograph_core::{Config, EntityRegistry, PropertyGraph, TripleStore};

/// MCP request handlers over the integration core.
pub struct Handlers {
    registry: Arc<EntityRegistry>,
    primekg: Arc<dyn PropertyGraph>,
    genelab: Arc<dyn TripleStore>,
    config: Config,
    resolver: CrossGraphResolver,
    engine: Arc<EnrichmentEngine>,
    composer: MechanismComposer,
    comparator: SetComparator,
}

impl Handlers {
    pub fn new(
        registry: Arc<EntityRegistry>,
        primekg: Arc<dyn PropertyGraph>,
        genelab: Arc<dyn TripleStore>,
        config: Config,
    ) -> Self {
        let resolver = CrossGraphResolver::new(
            registry.clone(),
            primekg.clone(),
            genelab.clone(),
            config.clone(),
        );
        let engine = Arc::new(EnrichmentEngine::new(
            registry.clone(),
            primekg.clone(),
            config.clone(),
        ));
        let composer = MechanismComposer::new(registry.clone(), primekg.clone(), config.clone());
        let comparator = SetComparator::new(registry.clone(), engine.clone(), config.type_policy);
        Self {
            registry,
            primekg,
            genelab,
            config,
            resolver,
            engine,
            composer,
            comparator,
        }
    }
}
