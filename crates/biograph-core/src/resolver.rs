//! Cross-graph entity resolution.
//!
//! Takes a map of entity-type wire names to raw identifier lists, normalizes
//! each batch, and checks existence against both graphs concurrently. The
//! output is a four-way partition per type (both graphs, PrimeKG only,
//! GeneLab only, neither) plus bookkeeping for inputs that never reached a
//! query: unknown type keys land in `skipped`, and a backend or timeout
//! failure marks that one type as `failed` without sinking the rest of the
//! call.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::backend::{with_timeout, GraphSource, PropertyGraph, Row, TripleStore};
use crate::config::{Config, TypePolicy};
use crate::error::{IntegrationError, Result};
use crate::normalize::normalize_batch;
use crate::queries::{cypher, sparql};
use crate::registry::{EntityRegistry, EntityType};

/// Counts over the whole resolution call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionSummary {
    /// Identifiers that survived normalization and were queried.
    pub total_queried: usize,
    /// Of those, how many exist in both graphs.
    pub found_in_both: usize,
    /// `found_in_both / total_queried`; zero when nothing was queried.
    pub mapping_rate: f64,
}

/// Result of one resolution call. All identifier lists hold canonical
/// forms, not the raw caller spellings.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionResult {
    pub found_in_both: BTreeMap<EntityType, Vec<String>>,
    pub found_in_primekg_only: BTreeMap<EntityType, Vec<String>>,
    pub found_in_genelab_only: BTreeMap<EntityType, Vec<String>>,
    pub not_found: BTreeMap<EntityType, Vec<String>>,
    /// Input keys that named no known entity type (lenient policy only).
    pub skipped: Vec<String>,
    /// Types whose backend sub-queries failed, with the failure message.
    pub failed: BTreeMap<EntityType, String>,
    pub summary: ResolutionSummary,
}

/// Per-type partition before assembly into the full result.
#[derive(Debug, Default)]
struct TypePartition {
    both: Vec<String>,
    primekg_only: Vec<String>,
    genelab_only: Vec<String>,
    not_found: Vec<String>,
    queried: usize,
}

/// Resolves identifier existence across both graphs.
pub struct CrossGraphResolver {
    registry: Arc<EntityRegistry>,
    primekg: Arc<dyn PropertyGraph>,
    genelab: Arc<dyn TripleStore>,
    config: Config,
}

impl CrossGraphResolver {
    pub fn new(
        registry: Arc<EntityRegistry>,
        primekg: Arc<dyn PropertyGraph>,
        genelab: Arc<dyn TripleStore>,
        config: Config,
    ) -> Self {
        Self {
            registry,
            primekg,
            genelab,
            config,
        }
    }

    /// Resolve every typed identifier batch in `input`.
    ///
    /// Type batches run concurrently, capped by
    /// `config.max_concurrent_queries`. Backend and timeout failures are
    /// isolated per type; validation failures follow the configured
    /// [`TypePolicy`].
    pub async fn resolve(&self, input: &BTreeMap<String, Vec<String>>) -> Result<ResolutionResult> {
        let mut result = ResolutionResult::default();

        let mut typed: Vec<(EntityType, &[String])> = Vec::new();
        for (key, raws) in input {
            match key.parse::<EntityType>() {
                Ok(ty) => typed.push((ty, raws)),
                Err(err) => {
                    if self.config.type_policy == TypePolicy::Strict {
                        return Err(err);
                    }
                    warn!(key = %key, "skipping unknown entity type");
                    result.skipped.push(key.clone());
                }
            }
        }

        let outcomes: Vec<(EntityType, Result<TypePartition>)> = stream::iter(
            typed
                .into_iter()
                .map(|(ty, raws)| async move { (ty, self.resolve_type(ty, raws).await) }),
        )
        .buffer_unordered(self.config.max_concurrent_queries)
        .collect()
        .await;

        for (ty, outcome) in outcomes {
            match outcome {
                Ok(part) => {
                    result.summary.total_queried += part.queried;
                    result.summary.found_in_both += part.both.len();
                    if !part.both.is_empty() {
                        result.found_in_both.insert(ty, part.both);
                    }
                    if !part.primekg_only.is_empty() {
                        result.found_in_primekg_only.insert(ty, part.primekg_only);
                    }
                    if !part.genelab_only.is_empty() {
                        result.found_in_genelab_only.insert(ty, part.genelab_only);
                    }
                    if !part.not_found.is_empty() {
                        result.not_found.insert(ty, part.not_found);
                    }
                }
                Err(err) if err.is_recoverable() => {
                    warn!(entity_type = %ty, %err, "resolution failed for type");
                    result.failed.insert(ty, err.to_string());
                }
                Err(err) => return Err(err),
            }
        }

        if result.summary.total_queried > 0 {
            result.summary.mapping_rate =
                result.summary.found_in_both as f64 / result.summary.total_queried as f64;
        }
        Ok(result)
    }

    async fn resolve_type(&self, ty: EntityType, raws: &[String]) -> Result<TypePartition> {
        let canon = normalize_batch(raws, ty, &self.registry, self.config.type_policy)?;
        if canon.is_empty() {
            return Ok(TypePartition::default());
        }
        let desc = self
            .registry
            .descriptor(ty)
            .ok_or_else(|| IntegrationError::UnknownEntityType(ty.to_string()))?;

        // Split the ID and name channels for the property graph; the triple
        // store matches everything through one lookup predicate.
        let mut ids = Vec::new();
        let mut names = Vec::new();
        let mut all = Vec::new();
        for c in &canon {
            all.push(c.as_str().to_string());
            if c.is_id_for(ty, &self.registry) {
                ids.push(c.as_str().to_string());
            } else {
                names.push(c.as_str().to_string());
            }
        }
        debug!(
            entity_type = %ty,
            ids = ids.len(),
            names = names.len(),
            "resolving identifier batch"
        );

        let pk_query = cypher::find_nodes(desc);
        let pk_params = json!({ "ids": ids, "names": names });
        let gl_query = sparql::substitute(
            &sparql::find_nodes(desc),
            &[("id_list", sparql::SparqlValue::List(all))],
        )?;

        let limit = self.config.query_timeout;
        let (pk_rows, gl_rows) = tokio::try_join!(
            with_timeout(
                GraphSource::PrimeKg,
                limit,
                self.primekg.query(&pk_query, pk_params),
            ),
            with_timeout(GraphSource::GeneLab, limit, self.genelab.query(&gl_query)),
        )?;

        let pk_hits = hit_set(&pk_rows);
        let gl_hits = hit_set(&gl_rows);

        let mut part = TypePartition {
            queried: canon.len(),
            ..TypePartition::default()
        };
        for c in canon {
            let key = c.as_str().to_lowercase();
            let id = c.into_string();
            match (pk_hits.contains(&key), gl_hits.contains(&key)) {
                (true, true) => part.both.push(id),
                (true, false) => part.primekg_only.push(id),
                (false, true) => part.genelab_only.push(id),
                (false, false) => part.not_found.push(id),
            }
        }
        Ok(part)
    }
}

/// Lowercased values of the `name` and `id` fields across all rows.
fn hit_set(rows: &[Row]) -> BTreeSet<String> {
    rows.iter()
        .flat_map(|row| {
            ["name", "id"]
                .into_iter()
                .filter_map(|f| crate::backend::row_str(row, f))
        })
        .map(str::to_lowercase)
        .collect()
}
