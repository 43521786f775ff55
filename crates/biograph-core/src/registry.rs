//! Entity type registry: the static table describing how each entity type
//! is keyed in each graph.
//!
//! The registry is an immutable value constructed once at startup and passed
//! explicitly to the resolver and enrichment engine, so tests can substitute
//! alternate tables without touching globals.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IntegrationError;

/// The eight entity types shared between the two graphs.
///
/// Wire names are the plural snake_case forms used by the tool inputs
/// (`genes`, `diseases`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    #[serde(rename = "genes")]
    Gene,
    #[serde(rename = "diseases")]
    Disease,
    #[serde(rename = "anatomies")]
    Anatomy,
    #[serde(rename = "pathways")]
    Pathway,
    #[serde(rename = "drugs")]
    Drug,
    #[serde(rename = "biological_processes")]
    BiologicalProcess,
    #[serde(rename = "molecular_functions")]
    MolecularFunction,
    #[serde(rename = "cellular_components")]
    CellularComponent,
}

impl EntityType {
    /// All supported types, in registry order.
    pub const ALL: [EntityType; 8] = [
        EntityType::Gene,
        EntityType::Disease,
        EntityType::Anatomy,
        EntityType::Pathway,
        EntityType::Drug,
        EntityType::BiologicalProcess,
        EntityType::MolecularFunction,
        EntityType::CellularComponent,
    ];

    /// Plural wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Gene => "genes",
            EntityType::Disease => "diseases",
            EntityType::Anatomy => "anatomies",
            EntityType::Pathway => "pathways",
            EntityType::Drug => "drugs",
            EntityType::BiologicalProcess => "biological_processes",
            EntityType::MolecularFunction => "molecular_functions",
            EntityType::CellularComponent => "cellular_components",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = IntegrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| IntegrationError::UnknownEntityType(s.to_string()))
    }
}

/// Which PrimeKG node property an entity type is looked up by.
///
/// Genes are matched by display name (symbol); every ID-carrying type is
/// matched by its stable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupField {
    NodeName,
    NodeId,
}

impl LookupField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupField::NodeName => "node_name",
            LookupField::NodeId => "node_id",
        }
    }
}

/// Per-type mapping between the two graphs.
#[derive(Debug, Clone)]
pub struct EntityDescriptor {
    /// PrimeKG node label.
    pub primekg_label: &'static str,
    /// PrimeKG lookup property.
    pub primekg_key: LookupField,
    /// GeneLab class name.
    pub genelab_label: &'static str,
    /// GeneLab lookup predicate.
    pub genelab_key: &'static str,
    /// Required identifier prefix; `None` for name-matched types.
    pub id_prefix: Option<&'static str>,
    /// Human-readable description for the schema tool.
    pub description: &'static str,
}

/// Immutable table of entity descriptors.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    descriptors: BTreeMap<EntityType, EntityDescriptor>,
}

impl EntityRegistry {
    /// The built-in PrimeKG/GeneLab mapping table.
    pub fn builtin() -> Self {
        let mut descriptors = BTreeMap::new();
        descriptors.insert(
            EntityType::Gene,
            EntityDescriptor {
                primekg_label: "gene/protein",
                primekg_key: LookupField::NodeName,
                genelab_label: "Gene",
                genelab_key: "gene_symbol",
                id_prefix: None,
                description: "Gene symbols (e.g. TP53, BRCA1)",
            },
        );
        descriptors.insert(
            EntityType::Disease,
            EntityDescriptor {
                primekg_label: "disease",
                primekg_key: LookupField::NodeId,
                genelab_label: "Disease",
                genelab_key: "mondo_id",
                id_prefix: Some("MONDO:"),
                description: "MONDO disease IDs",
            },
        );
        descriptors.insert(
            EntityType::Anatomy,
            EntityDescriptor {
                primekg_label: "anatomy",
                primekg_key: LookupField::NodeId,
                genelab_label: "Anatomy",
                genelab_key: "uberon_id",
                id_prefix: Some("UBERON:"),
                description: "UBERON anatomy IDs",
            },
        );
        descriptors.insert(
            EntityType::Pathway,
            EntityDescriptor {
                primekg_label: "pathway",
                primekg_key: LookupField::NodeId,
                genelab_label: "Pathway",
                genelab_key: "reactome_id",
                id_prefix: Some("R-HSA-"),
                description: "Reactome pathway IDs",
            },
        );
        descriptors.insert(
            EntityType::Drug,
            EntityDescriptor {
                primekg_label: "drug",
                primekg_key: LookupField::NodeId,
                genelab_label: "Compound",
                genelab_key: "drugbank_id",
                id_prefix: Some("DB"),
                description: "DrugBank IDs",
            },
        );
        descriptors.insert(
            EntityType::BiologicalProcess,
            EntityDescriptor {
                primekg_label: "biological_process",
                primekg_key: LookupField::NodeId,
                genelab_label: "BiologicalProcess",
                genelab_key: "go_id",
                id_prefix: Some("GO:"),
                description: "GO Biological Process IDs",
            },
        );
        descriptors.insert(
            EntityType::MolecularFunction,
            EntityDescriptor {
                primekg_label: "molecular_function",
                primekg_key: LookupField::NodeId,
                genelab_label: "MolecularFunction",
                genelab_key: "go_id",
                id_prefix: Some("GO:"),
                description: "GO Molecular Function IDs",
            },
        );
        descriptors.insert(
            EntityType::CellularComponent,
            EntityDescriptor {
                primekg_label: "cellular_component",
                primekg_key: LookupField::NodeId,
                genelab_label: "CellularComponent",
                genelab_key: "go_id",
                id_prefix: Some("GO:"),
                description: "GO Cellular Component IDs",
            },
        );
        Self { descriptors }
    }

    /// Descriptor for a type. Every `EntityType` has exactly one entry in
    /// the builtin table; custom tables may be partial.
    pub fn descriptor(&self, ty: EntityType) -> Option<&EntityDescriptor> {
        self.descriptors.get(&ty)
    }

    /// Iterate all (type, descriptor) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (EntityType, &EntityDescriptor)> {
        self.descriptors.iter().map(|(t, d)| (*t, d))
    }

    /// Human-readable integration schema, one block per entity type.
    pub fn schema_text(&self) -> String {
        let mut out = String::from(
            "PrimeKG-GeneLab Integration Schema\n==================================\n\n",
        );
        for (i, (ty, d)) in self.iter().enumerate() {
            out.push_str(&format!(
                "{}. {}\n   PrimeKG: {}.{}\n   GeneLab: {}.{}\n   {}\n\n",
                i + 1,
                ty.as_str().to_uppercase(),
                d.primekg_label,
                d.primekg_key.as_str(),
                d.genelab_label,
                d.genelab_key,
                d.description,
            ));
        }
        out
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_exactly_one_descriptor() {
        let reg = EntityRegistry::builtin();
        for ty in EntityType::ALL {
            assert!(reg.descriptor(ty).is_some(), "missing descriptor for {ty}");
        }
        assert_eq!(reg.iter().count(), EntityType::ALL.len());
    }

    #[test]
    fn wire_names_round_trip() {
        for ty in EntityType::ALL {
            let parsed: EntityType = ty.as_str().parse().unwrap();
            assert_eq!(parsed, ty);
        }
        let json = serde_json::to_string(&EntityType::BiologicalProcess).unwrap();
        assert_eq!(json, "\"biological_processes\"");
    }

    #[test]
    fn unknown_wire_name_is_rejected() {
        let err = "proteins".parse::<EntityType>().unwrap_err();
        assert!(matches!(
            err,
            IntegrationError::UnknownEntityType(ref s) if s == "proteins"
        ));
    }

    #[test]
    fn genes_are_name_matched_and_prefixless() {
        let reg = EntityRegistry::builtin();
        let gene = reg.descriptor(EntityType::Gene).unwrap();
        assert_eq!(gene.primekg_key, LookupField::NodeName);
        assert!(gene.id_prefix.is_none());
    }

    #[test]
    fn schema_text_mentions_all_types() {
        let text = EntityRegistry::builtin().schema_text();
        for ty in EntityType::ALL {
            assert!(text.contains(&ty.as_str().to_uppercase()));
        }
    }
}
