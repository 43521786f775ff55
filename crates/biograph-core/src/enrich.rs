//! Multi-hop entity enrichment.
//!
//! For each requested entity the engine fans out one query per relation
//! channel and merges the results into per-entity buckets keyed by channel
//! name. Channels are independent: a relation with no edges contributes an
//! empty bucket and never suppresses the others.
//!
//! Depth 2 and 3 expand through the previous level's frontier: channels
//! marked expandable (diseases, pathways, anatomy, and every `genes`
//! channel) are re-enriched one hop with their own channel tables, and the
//! resulting buckets merge back into the originating record, deduplicated
//! by (name, id).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::backend::{row_str, with_timeout, GraphSource, PropertyGraph, Row};
use crate::config::{Config, TypePolicy};
use crate::error::{IntegrationError, Result};
use crate::normalize::normalize_batch;
use crate::queries::cypher::{self, ChannelQuery};
use crate::registry::{EntityRegistry, EntityType};

/// Traversal depth, capped at three hops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HopDepth(u8);

impl HopDepth {
    pub const ONE: HopDepth = HopDepth(1);

    /// `None` outside 1..=3.
    pub fn new(depth: u8) -> Option<Self> {
        (1..=3).contains(&depth).then_some(Self(depth))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for HopDepth {
    fn default() -> Self {
        Self::ONE
    }
}

/// Which gene relation channels a gene-enrichment call queries. Disabled
/// channels are never sent to the backend.
#[derive(Debug, Clone, Copy)]
pub struct GeneChannels {
    pub drugs: bool,
    pub diseases: bool,
    pub pathways: bool,
    pub go_terms: bool,
    pub anatomy: bool,
}

impl Default for GeneChannels {
    fn default() -> Self {
        Self {
            drugs: true,
            diseases: true,
            pathways: true,
            go_terms: true,
            anatomy: true,
        }
    }
}

impl GeneChannels {
    fn allows(&self, channel: &str) -> bool {
        match channel {
            "drugs" => self.drugs,
            "diseases" => self.diseases,
            "pathways" => self.pathways,
            "biological_processes" | "molecular_functions" | "cellular_components" => {
                self.go_terms
            }
            "expressed_in" | "not_expressed_in" => self.anatomy,
            _ => true,
        }
    }
}

/// One related node, deduplicated by the (name, id) pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RelatedEntity {
    pub name: String,
    pub id: String,
}

type BucketMap = BTreeMap<String, BTreeSet<RelatedEntity>>;

/// Everything found for one requested entity.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentRecord {
    /// Canonical form of the requested identifier.
    pub entity: String,
    pub entity_type: EntityType,
    /// Channel name to related nodes.
    pub related: BucketMap,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichmentSummary {
    /// Records with at least one related node.
    pub entities_enriched: usize,
    /// Related nodes across all records and channels.
    pub total_relationships: usize,
    /// Channel names that produced results.
    pub related_types: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnrichmentOutcome {
    pub records: Vec<EnrichmentRecord>,
    /// Input keys that named no known entity type (lenient policy only).
    pub skipped: Vec<String>,
    /// Types whose channel queries failed, with the failure message.
    pub failed: BTreeMap<EntityType, String>,
    pub summary: EnrichmentSummary,
}

/// One queried entity: its ID and/or name channel value. Frontier subjects
/// carry both; top-level subjects carry whichever channel their canonical
/// form belongs to.
#[derive(Debug, Clone)]
struct Subject {
    id: Option<String>,
    name: Option<String>,
}

impl Subject {
    fn from_related(rel: &RelatedEntity) -> Self {
        Self {
            id: Some(rel.id.clone()),
            name: Some(rel.name.clone()),
        }
    }

    fn matches(&self, row: &Row) -> bool {
        let source = row_str(row, "source");
        let source_id = row_str(row, "source_id");
        self.name
            .as_deref()
            .zip(source)
            .is_some_and(|(n, s)| n.eq_ignore_ascii_case(s))
            || self
                .id
                .as_deref()
                .zip(source_id)
                .is_some_and(|(i, s)| i.eq_ignore_ascii_case(s))
    }
}

/// Fans relation-channel queries out against PrimeKG and merges them into
/// per-entity enrichment records.
pub struct EnrichmentEngine {
    registry: Arc<EntityRegistry>,
    primekg: Arc<dyn PropertyGraph>,
    config: Config,
}

impl EnrichmentEngine {
    pub fn new(
        registry: Arc<EntityRegistry>,
        primekg: Arc<dyn PropertyGraph>,
        config: Config,
    ) -> Self {
        Self {
            registry,
            primekg,
            config,
        }
    }

    /// Enrich every typed identifier batch in `input` to `depth` hops.
    ///
    /// Type batches run concurrently; backend and timeout failures are
    /// isolated per type, as in resolution.
    pub async fn enrich(
        &self,
        input: &BTreeMap<String, Vec<String>>,
        depth: HopDepth,
    ) -> Result<EnrichmentOutcome> {
        let mut outcome = EnrichmentOutcome::default();

        let mut typed: Vec<(EntityType, &[String])> = Vec::new();
        for (key, raws) in input {
            match key.parse::<EntityType>() {
                Ok(ty) => typed.push((ty, raws)),
                Err(err) => {
                    if self.config.type_policy == TypePolicy::Strict {
                        return Err(err);
                    }
                    warn!(key = %key, "skipping unknown entity type");
                    outcome.skipped.push(key.clone());
                }
            }
        }

        let batches: Vec<(EntityType, Result<Vec<EnrichmentRecord>>)> = stream::iter(
            typed
                .into_iter()
                .map(|(ty, raws)| async move { (ty, self.enrich_type(ty, raws, depth, None).await) }),
        )
        .buffer_unordered(self.config.max_concurrent_queries)
        .collect()
        .await;

        for (ty, batch) in batches {
            match batch {
                Ok(records) => outcome.records.extend(records),
                Err(err) if err.is_recoverable() => {
                    warn!(entity_type = %ty, %err, "enrichment failed for type");
                    outcome.failed.insert(ty, err.to_string());
                }
                Err(err) => return Err(err),
            }
        }
        outcome.summary = summarize(&outcome.records);
        Ok(outcome)
    }

    /// Single-hop gene enrichment with per-channel toggles.
    pub async fn enrich_genes(
        &self,
        names: &[String],
        channels: GeneChannels,
    ) -> Result<EnrichmentOutcome> {
        let mut outcome = EnrichmentOutcome::default();
        match self
            .enrich_type(EntityType::Gene, names, HopDepth::ONE, Some(channels))
            .await
        {
            Ok(records) => outcome.records = records,
            Err(err) if err.is_recoverable() => {
                warn!(%err, "gene enrichment failed");
                outcome.failed.insert(EntityType::Gene, err.to_string());
            }
            Err(err) => return Err(err),
        }
        outcome.summary = summarize(&outcome.records);
        Ok(outcome)
    }

    async fn enrich_type(
        &self,
        ty: EntityType,
        raws: &[String],
        depth: HopDepth,
        filter: Option<GeneChannels>,
    ) -> Result<Vec<EnrichmentRecord>> {
        let canon = normalize_batch(raws, ty, &self.registry, self.config.type_policy)?;
        if canon.is_empty() {
            return Ok(Vec::new());
        }
        let entities: Vec<String> = canon.into_iter().map(|c| c.into_string()).collect();
        let subjects: Vec<Subject> = entities
            .iter()
            .map(|value| {
                let is_id = self
                    .registry
                    .descriptor(ty)
                    .and_then(|d| d.id_prefix)
                    .is_some_and(|p| value.starts_with(p));
                if is_id {
                    Subject {
                        id: Some(value.clone()),
                        name: None,
                    }
                } else {
                    Subject {
                        id: None,
                        name: Some(value.clone()),
                    }
                }
            })
            .collect();

        let buckets = self
            .enrich_subjects(ty, subjects, depth.get(), filter)
            .await?;
        Ok(entities
            .into_iter()
            .zip(buckets)
            .map(|(entity, related)| EnrichmentRecord {
                entity,
                entity_type: ty,
                related,
            })
            .collect())
    }

    /// One enrichment level; recurses through expandable frontiers when
    /// `depth > 1`. Returns one bucket map per subject, in order.
    fn enrich_subjects<'a>(
        &'a self,
        ty: EntityType,
        subjects: Vec<Subject>,
        depth: u8,
        filter: Option<GeneChannels>,
    ) -> BoxFuture<'a, Result<Vec<BucketMap>>> {
        Box::pin(async move {
            let channels: Vec<ChannelQuery> = cypher::channel_queries(ty, &self.registry)
                .into_iter()
                .filter(|ch| filter.map_or(true, |f| f.allows(ch.name)))
                .collect();
            if subjects.is_empty() || channels.is_empty() {
                return Ok(vec![BucketMap::new(); subjects.len()]);
            }

            let ids: Vec<&str> = subjects.iter().filter_map(|s| s.id.as_deref()).collect();
            let names: Vec<&str> = subjects.iter().filter_map(|s| s.name.as_deref()).collect();
            let params = json!({ "ids": ids, "names": names });
            debug!(
                entity_type = %ty,
                subjects = subjects.len(),
                channels = channels.len(),
                depth,
                "running enrichment pass"
            );

            let limit = self.config.query_timeout;
            let fetched: Vec<Result<(ChannelQuery, Vec<Row>)>> =
                stream::iter(channels.into_iter().map(|ch| {
                    let params = params.clone();
                    async move {
                        let rows = with_timeout(
                            GraphSource::PrimeKg,
                            limit,
                            self.primekg.query(&ch.text, params),
                        )
                        .await?;
                        Ok((ch, rows))
                    }
                }))
                .buffer_unordered(self.config.max_concurrent_queries)
                .collect()
                .await;
            let fetched: Vec<(ChannelQuery, Vec<Row>)> =
                fetched.into_iter().collect::<Result<_>>()?;

            let mut buckets = vec![BucketMap::new(); subjects.len()];
            // Frontier per expandable channel: related entity -> the subject
            // indices it was reached from.
            let mut frontiers: BTreeMap<EntityType, BTreeMap<RelatedEntity, BTreeSet<usize>>> =
                BTreeMap::new();

            for (ch, rows) in &fetched {
                for row in rows {
                    let Some(name) = row_str(row, "name") else {
                        continue;
                    };
                    let id = row_str(row, "id").unwrap_or(name);
                    let rel = RelatedEntity {
                        name: name.to_string(),
                        id: id.to_string(),
                    };
                    for (i, subject) in subjects.iter().enumerate() {
                        if !subject.matches(row) {
                            continue;
                        }
                        buckets[i]
                            .entry(ch.name.to_string())
                            .or_default()
                            .insert(rel.clone());
                        if depth > 1 {
                            if let Some(target) = ch.expands_to {
                                frontiers
                                    .entry(target)
                                    .or_default()
                                    .entry(rel.clone())
                                    .or_default()
                                    .insert(i);
                            }
                        }
                    }
                }
            }

            for (target, frontier) in frontiers {
                let frontier_entities: Vec<RelatedEntity> = frontier.keys().cloned().collect();
                let frontier_subjects: Vec<Subject> = frontier_entities
                    .iter()
                    .map(Subject::from_related)
                    .collect();
                let expanded = self
                    .enrich_subjects(target, frontier_subjects, depth - 1, None)
                    .await?;
                for (entity, related) in frontier_entities.iter().zip(expanded) {
                    for (channel, rels) in related {
                        for &parent in &frontier[entity] {
                            buckets[parent]
                                .entry(channel.clone())
                                .or_default()
                                .extend(rels.iter().cloned());
                        }
                    }
                }
            }

            Ok(buckets)
        })
    }
}

fn summarize(records: &[EnrichmentRecord]) -> EnrichmentSummary {
    let mut summary = EnrichmentSummary::default();
    for record in records {
        if !record.related.is_empty() {
            summary.entities_enriched += 1;
        }
        for (channel, rels) in &record.related {
            summary.total_relationships += rels.len();
            if !rels.is_empty() {
                summary.related_types.insert(channel.clone());
            }
        }
    }
    summary
}
