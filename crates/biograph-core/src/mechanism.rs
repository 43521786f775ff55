//! Drug-disease mechanism composition.
//!
//! Four independent traversals connect a drug to a disease: a direct
//! indication edge, shared gene targets, shared pathways (through a gene on
//! each side), and shared anatomical expression context. The composer runs
//! the enabled ones concurrently and merges them into one report keyed by
//! the (drug, disease) pair; a channel disabled by the caller stays `None`
//! and contributes nothing to the evidence score.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::backend::{row_str, with_timeout, GraphSource, PropertyGraph, Row};
use crate::config::Config;
use crate::enrich::RelatedEntity;
use crate::error::Result;
use crate::normalize::normalize;
use crate::queries::cypher;
use crate::registry::{EntityRegistry, EntityType};

/// Which mechanism channels to query.
#[derive(Debug, Clone, Copy)]
pub struct MechanismOptions {
    pub include_direct: bool,
    pub include_gene_targets: bool,
    pub include_pathways: bool,
    pub include_anatomy: bool,
}

impl Default for MechanismOptions {
    fn default() -> Self {
        Self {
            include_direct: true,
            include_gene_targets: true,
            include_pathways: true,
            include_anatomy: true,
        }
    }
}

/// A pathway linking a drug-target gene to a disease-associated gene.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PathwayMechanism {
    pub pathway: String,
    pub pathway_id: String,
    pub drug_gene: String,
    pub disease_gene: String,
}

/// An anatomical location expressing a gene from each side.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct AnatomyContext {
    pub anatomy: String,
    pub anatomy_id: String,
    pub drug_gene: String,
    pub disease_gene: String,
}

/// Merged mechanistic evidence for one (drug, disease) pair. Channels the
/// caller disabled are `None`; channels that ran but found nothing are
/// `Some` and empty (or `Some(false)` for the direct edge).
#[derive(Debug, Clone, Serialize)]
pub struct MechanismReport {
    pub drug: String,
    pub disease: String,
    pub direct_indication: Option<bool>,
    pub gene_targets: Option<BTreeSet<RelatedEntity>>,
    pub pathway_mechanisms: Option<BTreeSet<PathwayMechanism>>,
    pub anatomical_context: Option<BTreeSet<AnatomyContext>>,
    pub evidence_strength: f64,
}

/// Weighted evidence score over the enabled channels, in [0, 1].
///
/// The direct indication outweighs the maximum contribution of any other
/// single channel; the count-based channels saturate at five hits. The
/// score is monotone non-decreasing in every argument.
pub fn evidence_strength(
    direct: Option<bool>,
    gene_targets: Option<usize>,
    pathways: Option<usize>,
    anatomies: Option<usize>,
) -> f64 {
    fn saturate(count: usize) -> f64 {
        (count as f64 / 5.0).min(1.0)
    }
    let mut strength = 0.0;
    if direct == Some(true) {
        strength += 0.4;
    }
    if let Some(n) = gene_targets {
        strength += 0.3 * saturate(n);
    }
    if let Some(n) = pathways {
        strength += 0.2 * saturate(n);
    }
    if let Some(n) = anatomies {
        strength += 0.1 * saturate(n);
    }
    strength
}

/// Composes drug-disease mechanism reports from PrimeKG traversals.
pub struct MechanismComposer {
    registry: Arc<EntityRegistry>,
    primekg: Arc<dyn PropertyGraph>,
    config: Config,
}

impl MechanismComposer {
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

    /// Run the enabled mechanism channels for one (drug, disease) pair.
    ///
    /// # Errors
    ///
    /// Validation errors for malformed identifiers; backend and timeout
    /// errors from any enabled channel fail the whole call.
    pub async fn find_mechanisms(
        &self,
        drug: &str,
        disease: &str,
        opts: MechanismOptions,
    ) -> Result<MechanismReport> {
        let drug = normalize(drug, EntityType::Drug, &self.registry)?.into_string();
        let disease = normalize(disease, EntityType::Disease, &self.registry)?.into_string();
        let params = json!({ "drug": drug, "disease": disease });
        debug!(drug = %drug, disease = %disease, "composing mechanism report");

        let (direct, targets, pathways, anatomy) = tokio::try_join!(
            self.fetch(opts.include_direct, cypher::MECH_DIRECT, &params),
            self.fetch(opts.include_gene_targets, cypher::MECH_GENE_TARGETS, &params),
            self.fetch(opts.include_pathways, cypher::MECH_PATHWAYS, &params),
            self.fetch(opts.include_anatomy, cypher::MECH_ANATOMY, &params),
        )?;

        let direct_indication = direct.map(|rows| !rows.is_empty());
        let gene_targets = targets.map(|rows| {
            rows.iter()
                .filter_map(|row| {
                    let name = row_str(row, "name")?;
                    Some(RelatedEntity {
                        name: name.to_string(),
                        id: row_str(row, "id").unwrap_or(name).to_string(),
                    })
                })
                .collect::<BTreeSet<_>>()
        });
        let pathway_mechanisms = pathways.map(|rows| {
            rows.iter()
                .filter_map(|row| {
                    Some(PathwayMechanism {
                        pathway: row_str(row, "name")?.to_string(),
                        pathway_id: row_str(row, "id").unwrap_or_default().to_string(),
                        drug_gene: row_str(row, "drug_gene")?.to_string(),
                        disease_gene: row_str(row, "disease_gene")?.to_string(),
                    })
                })
                .collect::<BTreeSet<_>>()
        });
        let anatomical_context = anatomy.map(|rows| {
            rows.iter()
                .filter_map(|row| {
                    Some(AnatomyContext {
                        anatomy: row_str(row, "name")?.to_string(),
                        anatomy_id: row_str(row, "id").unwrap_or_default().to_string(),
                        drug_gene: row_str(row, "drug_gene")?.to_string(),
                        disease_gene: row_str(row, "disease_gene")?.to_string(),
                    })
                })
                .collect::<BTreeSet<_>>()
        });

        let evidence_strength = evidence_strength(
            direct_indication,
            gene_targets.as_ref().map(BTreeSet::len),
            pathway_mechanisms.as_ref().map(BTreeSet::len),
            anatomical_context.as_ref().map(BTreeSet::len),
        );

        Ok(MechanismReport {
            drug,
            disease,
            direct_indication,
            gene_targets,
            pathway_mechanisms,
            anatomical_context,
            evidence_strength,
        })
    }

    async fn fetch(
        &self,
        enabled: bool,
        query: &'static str,
        params: &Value,
    ) -> Result<Option<Vec<Row>>> {
        if !enabled {
            return Ok(None);
        }
        let rows = with_timeout(
            GraphSource::PrimeKg,
            self.config.query_timeout,
            self.primekg.query(query, params.clone()),
        )
        .await?;
        Ok(Some(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntegrationError;
    use crate::testing::{row, FakePrimeKg};

    fn composer(pk: FakePrimeKg) -> MechanismComposer {
        MechanismComposer::new(
            Arc::new(EntityRegistry::builtin()),
            Arc::new(pk),
            Config::default(),
        )
    }

    #[test]
    fn evidence_is_monotone_and_bounded() {
        let base = evidence_strength(Some(false), Some(0), Some(0), Some(0));
        assert_eq!(base, 0.0);
        let mut prev = base;
        for n in 1..=7 {
            let s = evidence_strength(Some(false), Some(n), Some(n), Some(n));
            assert!(s >= prev);
            assert!(s <= 1.0);
            prev = s;
        }
        let full = evidence_strength(Some(true), Some(5), Some(5), Some(5));
        assert!((full - 1.0).abs() < 1e-9);
        // Saturation: more hits past five change nothing.
        assert_eq!(full, evidence_strength(Some(true), Some(50), Some(50), Some(50)));
    }

    #[test]
    fn direct_indication_dominates_any_other_channel() {
        let direct_only = evidence_strength(Some(true), Some(0), Some(0), Some(0));
        for other in [
            evidence_strength(Some(false), Some(100), None, None),
            evidence_strength(Some(false), None, Some(100), None),
            evidence_strength(Some(false), None, None, Some(100)),
        ] {
            assert!(direct_only > other);
        }
    }

    #[test]
    fn disabled_channels_are_excluded_from_the_score() {
        let with_anatomy = evidence_strength(Some(true), Some(3), Some(2), Some(4));
        let without = evidence_strength(Some(true), Some(3), Some(2), None);
        assert!(without < with_anatomy);
        assert_eq!(without, evidence_strength(Some(true), Some(3), Some(2), Some(0)));
    }

    #[tokio::test]
    async fn aspirin_report_without_anatomy() {
        let pk = Arc::new(
            FakePrimeKg::new()
                .on(
                    &["[:indication]"],
                    vec![row(&[
                        ("drug_name", "Aspirin"),
                        ("disease_name", "coronary artery disease"),
                    ])],
                )
                .on(
                    &["[:drug_protein]", "[:disease_protein]", "DISTINCT g.node_name"],
                    vec![
                        row(&[("name", "PTGS1"), ("id", "PTGS1")]),
                        row(&[("name", "PTGS2"), ("id", "PTGS2")]),
                    ],
                )
                .on(
                    &["(p:pathway)"],
                    vec![row(&[
                        ("name", "Prostaglandin synthesis"),
                        ("id", "R-HSA-2162123"),
                        ("drug_gene", "PTGS1"),
                        ("disease_gene", "PTGS2"),
                    ])],
                ),
        );
        let composer = MechanismComposer::new(
            Arc::new(EntityRegistry::builtin()),
            pk.clone(),
            Config::default(),
        );

        let opts = MechanismOptions {
            include_anatomy: false,
            ..MechanismOptions::default()
        };
        let report = composer
            .find_mechanisms("Aspirin", "coronary artery disease", opts)
            .await
            .unwrap();

        assert_eq!(report.direct_indication, Some(true));
        assert_eq!(report.gene_targets.as_ref().unwrap().len(), 2);
        assert_eq!(report.pathway_mechanisms.as_ref().unwrap().len(), 1);
        assert!(report.anatomical_context.is_none());
        let expected = evidence_strength(Some(true), Some(2), Some(1), None);
        assert!((report.evidence_strength - expected).abs() < 1e-9);

        for (query, _) in pk.calls() {
            assert!(!query.contains("(a:anatomy)"), "anatomy channel was queried");
        }
    }

    #[tokio::test]
    async fn absent_edges_give_a_zero_score_not_an_error() {
        let report = composer(FakePrimeKg::new())
            .find_mechanisms("DB00945", "MONDO:0004992", MechanismOptions::default())
            .await
            .unwrap();
        assert_eq!(report.direct_indication, Some(false));
        assert!(report.gene_targets.unwrap().is_empty());
        assert_eq!(report.evidence_strength, 0.0);
    }

    #[tokio::test]
    async fn malformed_drug_id_is_rejected_before_querying() {
        let pk = Arc::new(FakePrimeKg::new());
        let composer = MechanismComposer::new(
            Arc::new(EntityRegistry::builtin()),
            pk.clone(),
            Config::default(),
        );
        let err = composer
            .find_mechanisms("DB12", "asthma", MechanismOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrationError::Validation { .. }));
        assert!(pk.calls().is_empty());
    }
}
