//! Gene-set comparison.
//!
//! Pure set arithmetic over normalized symbols, plus shared-annotation
//! discovery: the union of both sets is enriched once through the
//! enrichment engine, and an annotation counts as shared when at least one
//! gene from each set carries it. A gene in the overlap satisfies both
//! sides on its own.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use crate::config::TypePolicy;
use crate::enrich::{EnrichmentEngine, GeneChannels, RelatedEntity};
use crate::error::Result;
use crate::normalize::normalize_batch;
use crate::registry::{EntityRegistry, EntityType};

/// Result of comparing two gene sets.
#[derive(Debug, Clone, Serialize)]
pub struct SetComparison {
    pub set1_name: String,
    pub set2_name: String,
    pub set1_size: usize,
    pub set2_size: usize,
    pub overlap: Vec<String>,
    pub unique_to_set1: Vec<String>,
    pub unique_to_set2: Vec<String>,
    pub jaccard_index: f64,
    pub shared_pathways: BTreeSet<RelatedEntity>,
    pub shared_diseases: BTreeSet<RelatedEntity>,
    pub shared_anatomies: BTreeSet<RelatedEntity>,
    /// Set when the annotation enrichment failed; the set arithmetic above
    /// is still valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation_error: Option<String>,
}

/// Jaccard index of two sets; zero when both are empty.
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Compares gene sets and annotates their shared biology.
pub struct SetComparator {
    registry: Arc<EntityRegistry>,
    engine: Arc<EnrichmentEngine>,
    type_policy: TypePolicy,
}

impl SetComparator {
    pub fn new(
        registry: Arc<EntityRegistry>,
        engine: Arc<EnrichmentEngine>,
        type_policy: TypePolicy,
    ) -> Self {
        Self {
            registry,
            engine,
            type_policy,
        }
    }

    /// Compare two gene symbol sets.
    pub async fn compare(
        &self,
        set1: &[String],
        set2: &[String],
        name1: &str,
        name2: &str,
    ) -> Result<SetComparison> {
        let a: BTreeSet<String> =
            normalize_batch(set1, EntityType::Gene, &self.registry, self.type_policy)?
                .into_iter()
                .map(|c| c.into_string())
                .collect();
        let b: BTreeSet<String> =
            normalize_batch(set2, EntityType::Gene, &self.registry, self.type_policy)?
                .into_iter()
                .map(|c| c.into_string())
                .collect();

        let overlap: Vec<String> = a.intersection(&b).cloned().collect();
        let unique_to_set1: Vec<String> = a.difference(&b).cloned().collect();
        let unique_to_set2: Vec<String> = b.difference(&a).cloned().collect();
        let jaccard_index = jaccard(&a, &b);

        let union: Vec<String> = a.union(&b).cloned().collect();
        let channels = GeneChannels {
            drugs: false,
            go_terms: false,
            ..GeneChannels::default()
        };
        let enriched = self.engine.enrich_genes(&union, channels).await?;

        let mut annotation_error = None;
        if let Some(message) = enriched.failed.values().next() {
            warn!(%message, "shared-annotation enrichment failed");
            annotation_error = Some(message.clone());
        }

        // annotation -> which side(s) of the comparison reached it
        let mut hits: BTreeMap<(&str, &RelatedEntity), (bool, bool)> = BTreeMap::new();
        for record in &enriched.records {
            let in_a = a.contains(&record.entity);
            let in_b = b.contains(&record.entity);
            for (channel, rels) in &record.related {
                for rel in rels {
                    let entry = hits.entry((channel.as_str(), rel)).or_insert((false, false));
                    entry.0 |= in_a;
                    entry.1 |= in_b;
                }
            }
        }

        let shared = |wanted: &str| -> BTreeSet<RelatedEntity> {
            hits.iter()
                .filter(|((channel, _), (in_a, in_b))| *channel == wanted && *in_a && *in_b)
                .map(|((_, rel), _)| (*rel).clone())
                .collect()
        };

        Ok(SetComparison {
            set1_name: name1.to_string(),
            set2_name: name2.to_string(),
            set1_size: a.len(),
            set2_size: b.len(),
            overlap,
            unique_to_set1,
            unique_to_set2,
            jaccard_index,
            shared_pathways: shared("pathways"),
            shared_diseases: shared("diseases"),
            shared_anatomies: shared("expressed_in"),
            annotation_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::testing::{row, FakePrimeKg};

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn symbols(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn comparator(pk: FakePrimeKg) -> SetComparator {
        let registry = Arc::new(EntityRegistry::builtin());
        let engine = Arc::new(EnrichmentEngine::new(
            registry.clone(),
            Arc::new(pk),
            Config::default(),
        ));
        SetComparator::new(registry, engine, TypePolicy::Lenient)
    }

    fn pathway_row(gene: &str, pathway: &str) -> crate::backend::Row {
        row(&[
            ("source", gene),
            ("source_id", gene),
            ("name", pathway),
            ("id", pathway),
        ])
    }

    #[test]
    fn jaccard_identity_symmetry_disjoint_empty() {
        let a = set(&["A", "B", "C"]);
        let b = set(&["B", "C", "D"]);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-9);
        assert_eq!(jaccard(&a, &set(&[])), 0.0);
        assert_eq!(jaccard(&set(&[]), &set(&[])), 0.0);
    }

    #[tokio::test]
    async fn abc_vs_bcd_partitions_and_scores() {
        let out = comparator(FakePrimeKg::new())
            .compare(&symbols(&["A", "B", "C"]), &symbols(&["B", "C", "D"]), "one", "two")
            .await
            .unwrap();
        assert_eq!(out.overlap, vec!["B", "C"]);
        assert_eq!(out.unique_to_set1, vec!["A"]);
        assert_eq!(out.unique_to_set2, vec!["D"]);
        assert_eq!(out.set1_size, 3);
        assert_eq!(out.set2_size, 3);
        assert!((out.jaccard_index - 0.5).abs() < 1e-9);
        assert!(out.annotation_error.is_none());
    }

    #[tokio::test]
    async fn normalization_unifies_case_before_comparing() {
        let out = comparator(FakePrimeKg::new())
            .compare(&symbols(&["tp53", "BRCA1"]), &symbols(&["TP53"]), "a", "b")
            .await
            .unwrap();
        assert_eq!(out.overlap, vec!["TP53"]);
        assert_eq!(out.unique_to_set1, vec!["BRCA1"]);
        assert!(out.unique_to_set2.is_empty());
    }

    #[tokio::test]
    async fn shared_annotations_need_a_hit_from_each_side() {
        let pk = FakePrimeKg::new().on(
            &["(s:`gene/protein`)", "[:pathway_protein]"],
            vec![
                // P1: one gene from each side.
                pathway_row("A", "P1"),
                pathway_row("D", "P1"),
                // P2: only reached from set 1.
                pathway_row("A", "P2"),
                // P3: reached by an overlap gene, which counts for both.
                pathway_row("B", "P3"),
            ],
        );
        let out = comparator(pk)
            .compare(&symbols(&["A", "B", "C"]), &symbols(&["B", "C", "D"]), "one", "two")
            .await
            .unwrap();

        let names: BTreeSet<&str> =
            out.shared_pathways.iter().map(|r| r.name.as_str()).collect();
        assert!(names.contains("P1"));
        assert!(!names.contains("P2"));
        assert!(names.contains("P3"));
    }

    #[tokio::test]
    async fn annotation_failure_keeps_the_set_arithmetic() {
        let out = comparator(FakePrimeKg::failing("down"))
            .compare(&symbols(&["A"]), &symbols(&["A", "B"]), "x", "y")
            .await
            .unwrap();
        assert_eq!(out.overlap, vec!["A"]);
        assert!(out.annotation_error.unwrap().contains("down"));
        assert!(out.shared_pathways.is_empty());
    }
}
