//! Cypher templates for the PrimeKG property graph.
//!
//! Every relation channel is its own single-relation query. The enrichment
//! engine and mechanism composer fan these out independently and merge by
//! key, so a missing relation in one channel never suppresses results in
//! another and never produces a cross-product.

use crate::registry::{EntityDescriptor, EntityRegistry, EntityType, LookupField};

// ============================================================================
// EXISTENCE LOOKUPS
// ============================================================================

/// Node-existence query for one entity type: matches the type's lookup
/// field against `$ids` and falls back to `node_name` against `$names` in
/// the same call, results unioned.
pub fn find_nodes(desc: &EntityDescriptor) -> String {
    format!(
        "MATCH (n:`{label}`)\n\
         WHERE n.{key} IN $ids OR n.node_name IN $names\n\
         RETURN n.node_name AS name, n.{key} AS id",
        label = desc.primekg_label,
        key = desc.primekg_key.as_str(),
    )
}

// ============================================================================
// RELATION CHANNELS
// ============================================================================

/// One independent relation channel from a source entity type.
#[derive(Debug, Clone)]
pub struct ChannelQuery {
    /// Bucket name in the enrichment record (`drugs`, `expressed_in`, ...).
    pub name: &'static str,
    /// Entity type of the related nodes; `Some` marks the channel as a
    /// frontier the engine may expand through at depth >= 2.
    pub expands_to: Option<EntityType>,
    /// Rendered Cypher, parameterized by `$ids` / `$names`.
    pub text: String,
}

fn channel(
    desc: &EntityDescriptor,
    name: &'static str,
    rel: &'static str,
    target_label: &'static str,
    expands_to: Option<EntityType>,
) -> ChannelQuery {
    ChannelQuery {
        name,
        expands_to,
        text: format!(
            "MATCH (s:`{label}`)\n\
             WHERE s.{key} IN $ids OR s.node_name IN $names\n\
             MATCH (s)-[:{rel}]-(t:`{target}`)\n\
             RETURN s.node_name AS source, s.node_id AS source_id,\n\
                    t.node_name AS name, t.node_id AS id",
            label = desc.primekg_label,
            key = desc.primekg_key.as_str(),
            rel = rel,
            target = target_label,
        ),
    }
}

/// The relation channels applicable to a source entity type, depth-1 edges
/// only. Deeper hops are reached by expanding channels whose `expands_to`
/// is set.
pub fn channel_queries(ty: EntityType, registry: &EntityRegistry) -> Vec<ChannelQuery> {
    let Some(desc) = registry.descriptor(ty) else {
        return Vec::new();
    };
    match ty {
        EntityType::Gene => vec![
            channel(desc, "drugs", "drug_protein", "drug", None),
            channel(desc, "diseases", "disease_protein", "disease", Some(EntityType::Disease)),
            channel(desc, "pathways", "pathway_protein", "pathway", Some(EntityType::Pathway)),
            channel(desc, "biological_processes", "bioprocess_protein", "biological_process", None),
            channel(desc, "molecular_functions", "molfunc_protein", "molecular_function", None),
            channel(desc, "cellular_components", "cellcomp_protein", "cellular_component", None),
            channel(desc, "expressed_in", "anatomy_protein_present", "anatomy", Some(EntityType::Anatomy)),
            channel(desc, "not_expressed_in", "anatomy_protein_absent", "anatomy", None),
        ],
        EntityType::Disease => vec![channel(
            desc,
            "genes",
            "disease_protein",
            "gene/protein",
            Some(EntityType::Gene),
        )],
        EntityType::Anatomy => vec![
            channel(desc, "expressed_genes", "anatomy_protein_present", "gene/protein", Some(EntityType::Gene)),
            channel(desc, "absent_genes", "anatomy_protein_absent", "gene/protein", None),
        ],
        EntityType::Pathway => vec![channel(
            desc,
            "genes",
            "pathway_protein",
            "gene/protein",
            Some(EntityType::Gene),
        )],
        EntityType::Drug => vec![
            channel(desc, "targets", "drug_protein", "gene/protein", Some(EntityType::Gene)),
            channel(desc, "indications", "indication", "disease", None),
            channel(desc, "contraindications", "contraindication", "disease", None),
        ],
        EntityType::BiologicalProcess => vec![channel(
            desc,
            "genes",
            "bioprocess_protein",
            "gene/protein",
            Some(EntityType::Gene),
        )],
        EntityType::MolecularFunction => vec![channel(
            desc,
            "genes",
            "molfunc_protein",
            "gene/protein",
            Some(EntityType::Gene),
        )],
        EntityType::CellularComponent => vec![channel(
            desc,
            "genes",
            "cellcomp_protein",
            "gene/protein",
            Some(EntityType::Gene),
        )],
    }
}

// ============================================================================
// DRUG-DISEASE MECHANISM CHANNELS
// ============================================================================
// Four independent traversals merged client-side by the (drug, disease)
// pair. A single combined pattern would zero out every channel whenever
// any one relation is absent.

/// Direct indication edge between drug and disease.
pub const MECH_DIRECT: &str = "\
MATCH (drug:drug) WHERE drug.node_name = $drug OR drug.node_id = $drug
MATCH (disease:disease) WHERE disease.node_name = $disease OR disease.node_id = $disease
MATCH (drug)-[:indication]-(disease)
RETURN drug.node_name AS drug_name, disease.node_name AS disease_name";

/// Genes targeted by the drug that are also associated with the disease.
pub const MECH_GENE_TARGETS: &str = "\
MATCH (drug:drug) WHERE drug.node_name = $drug OR drug.node_id = $drug
MATCH (disease:disease) WHERE disease.node_name = $disease OR disease.node_id = $disease
MATCH (drug)-[:drug_protein]-(g:`gene/protein`)-[:disease_protein]-(disease)
RETURN DISTINCT g.node_name AS name, g.node_id AS id";

/// Pathways shared between a drug-target gene and a disease-associated
/// gene; the two connecting genes need not be the same.
pub const MECH_PATHWAYS: &str = "\
MATCH (drug:drug) WHERE drug.node_name = $drug OR drug.node_id = $drug
MATCH (disease:disease) WHERE disease.node_name = $disease OR disease.node_id = $disease
MATCH (drug)-[:drug_protein]-(g1:`gene/protein`)-[:pathway_protein]-(p:pathway)
MATCH (p)-[:pathway_protein]-(g2:`gene/protein`)-[:disease_protein]-(disease)
RETURN DISTINCT p.node_name AS name, p.node_id AS id,
       g1.node_name AS drug_gene, g2.node_name AS disease_gene";

/// Anatomical locations where a drug-target gene and a disease-associated
/// gene are both expressed.
pub const MECH_ANATOMY: &str = "\
MATCH (drug:drug) WHERE drug.node_name = $drug OR drug.node_id = $drug
MATCH (disease:disease) WHERE disease.node_name = $disease OR disease.node_id = $disease
MATCH (drug)-[:drug_protein]-(g1:`gene/protein`)-[:anatomy_protein_present]-(a:anatomy)
MATCH (a)-[:anatomy_protein_present]-(g2:`gene/protein`)-[:disease_protein]-(disease)
RETURN DISTINCT a.node_name AS name, a.node_id AS id,
       g1.node_name AS drug_gene, g2.node_name AS disease_gene";

// ============================================================================
// ANALYSIS QUERIES
// ============================================================================

/// Genes expressed (or absent) in anatomical locations.
pub fn genes_in_anatomy(present: bool) -> &'static str {
    if present {
        "MATCH (a:anatomy)-[:anatomy_protein_present]-(g:`gene/protein`)\n\
         WHERE a.node_id IN $ids OR a.node_name IN $names\n\
         RETURN a.node_name AS anatomy_name, a.node_id AS anatomy_id,\n\
                collect(DISTINCT g.node_name) AS genes, count(DISTINCT g) AS gene_count\n\
         ORDER BY gene_count DESC"
    } else {
        "MATCH (a:anatomy)-[:anatomy_protein_absent]-(g:`gene/protein`)\n\
         WHERE a.node_id IN $ids OR a.node_name IN $names\n\
         RETURN a.node_name AS anatomy_name, a.node_id AS anatomy_id,\n\
                collect(DISTINCT g.node_name) AS genes, count(DISTINCT g) AS gene_count\n\
         ORDER BY gene_count DESC"
    }
}

/// Pathways associated with diseases through connecting genes.
pub const DISEASE_PATHWAYS: &str = "\
MATCH (d:disease)-[:disease_protein]-(g:`gene/protein`)-[:pathway_protein]-(p:pathway)
WHERE d.node_id IN $ids OR d.node_name IN $names
WITH d.node_name AS disease, p.node_name AS pathway, p.node_id AS pathway_id,
     collect(DISTINCT g.node_name) AS connecting_genes, count(DISTINCT g) AS gene_count
WHERE gene_count >= $min_genes
RETURN disease, pathway, pathway_id, connecting_genes, gene_count
ORDER BY gene_count DESC";

/// Drugs targeting genes inside pathways.
pub const DRUGS_FOR_PATHWAY: &str = "\
MATCH (p:pathway)-[:pathway_protein]-(g:`gene/protein`)-[:drug_protein]-(d:drug)
WHERE p.node_id IN $ids OR p.node_name IN $names
WITH p.node_name AS pathway, d.node_name AS drug, d.node_id AS drug_id,
     collect(DISTINCT g.node_name) AS target_genes, count(DISTINCT g) AS gene_count
RETURN pathway, drug, drug_id, target_genes, gene_count
ORDER BY gene_count DESC
LIMIT $limit";

/// Pathways shared across multiple diseases.
pub const COMMON_PATHWAYS_ACROSS_DISEASES: &str = "\
MATCH (d:disease)-[:disease_protein]-(g:`gene/protein`)-[:pathway_protein]-(p:pathway)
WHERE d.node_id IN $ids OR d.node_name IN $names
WITH p.node_name AS pathway, p.node_id AS pathway_id,
     collect(DISTINCT d.node_name) AS diseases, collect(DISTINCT g.node_name) AS genes,
     count(DISTINCT d) AS disease_count, count(DISTINCT g) AS gene_count
WHERE disease_count >= $min_diseases
RETURN pathway, pathway_id, diseases, genes, disease_count, gene_count
ORDER BY disease_count DESC, gene_count DESC";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_nodes_uses_registry_lookup_field() {
        let reg = EntityRegistry::builtin();
        let gene = find_nodes(reg.descriptor(EntityType::Gene).unwrap());
        assert!(gene.contains("n.node_name IN $ids"));
        let disease = find_nodes(reg.descriptor(EntityType::Disease).unwrap());
        assert!(disease.contains("n.node_id IN $ids"));
        assert!(disease.contains("n.node_name IN $names"));
    }

    #[test]
    fn gene_channels_cover_all_eight_relations() {
        let reg = EntityRegistry::builtin();
        let channels = channel_queries(EntityType::Gene, &reg);
        let names: Vec<_> = channels.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "drugs",
                "diseases",
                "pathways",
                "biological_processes",
                "molecular_functions",
                "cellular_components",
                "expressed_in",
                "not_expressed_in",
            ]
        );
    }

    #[test]
    fn every_type_has_at_least_one_channel() {
        let reg = EntityRegistry::builtin();
        for ty in EntityType::ALL {
            assert!(!channel_queries(ty, &reg).is_empty(), "no channels for {ty}");
        }
    }

    #[test]
    fn expandable_channels_carry_a_target_type() {
        let reg = EntityRegistry::builtin();
        let channels = channel_queries(EntityType::Gene, &reg);
        let pathways = channels.iter().find(|c| c.name == "pathways").unwrap();
        assert_eq!(pathways.expands_to, Some(EntityType::Pathway));
        let drugs = channels.iter().find(|c| c.name == "drugs").unwrap();
        assert_eq!(drugs.expands_to, None);
    }

    #[test]
    fn mechanism_channels_are_independent_queries() {
        // Each channel must stand alone: no OPTIONAL MATCH chaining.
        for q in [MECH_DIRECT, MECH_GENE_TARGETS, MECH_PATHWAYS, MECH_ANATOMY] {
            assert!(!q.contains("OPTIONAL"));
            assert!(q.contains("$drug"));
            assert!(q.contains("$disease"));
        }
    }
}
