//! Tool names as constants for dispatch matching.

// ========== SCHEMA / RESOLUTION ==========

pub const GET_SCHEMA: &str = "get_schema";
pub const FIND_COMMON_NODES: &str = "find_common_nodes";

// ========== ENRICHMENT / COMPARISON ==========

pub const ENRICH_ENTITIES: &str = "enrich_entities";
pub const ENRICH_GENES: &str = "enrich_genes";
pub const COMPARE_GENE_SETS: &str = "compare_gene_sets";

// ========== MECHANISM ==========

pub const FIND_DRUG_DISEASE_MECHANISMS: &str = "find_drug_disease_mechanisms";

// ========== PRIMEKG ANALYSIS ==========

pub const FIND_GENES_IN_ANATOMY: &str = "find_genes_in_anatomy";
pub const FIND_DISEASE_PATHWAYS: &str = "find_disease_pathways";
pub const FIND_DRUGS_FOR_PATHWAY: &str = "find_drugs_for_pathway";
pub const FIND_COMMON_PATHWAYS_ACROSS_DISEASES: &str = "find_common_pathways_across_diseases";

// ========== GEOSPATIAL / SDOH ==========

pub const FIND_DISEASE_PREVALENCE: &str = "find_disease_prevalence";
pub const FIND_SDOH_BY_LOCATION: &str = "find_sdoh_by_location";
