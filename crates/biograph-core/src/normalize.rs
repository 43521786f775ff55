//! Identifier normalization.
//!
//! Canonicalizes raw caller-supplied identifiers per entity type before any
//! of them reach a query string. The rules, per type:
//!
//! - genes: trim whitespace, uppercase; any non-empty string is a valid
//!   symbol.
//! - MONDO / UBERON / GO: the prefix is added when the input is a bare
//!   digit string; with the prefix present the suffix must be all digits.
//! - DrugBank: `DB` followed by exactly five digits.
//! - Reactome: `R-HSA-` is prepended to bare numeric ids; anything else
//!   passes through free-form because the source data is inconsistently
//!   prefixed.
//!
//! Inputs for ID-typed entities that neither carry the prefix nor look like
//! a bare id are classified as *names* and flow through the name-lookup
//! channel unchanged (trimmed only). This makes the original system's
//! silent pass-through an explicit, documented rule: a string only fails
//! validation when it claims to be an ID and gets the format wrong.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::config::TypePolicy;
use crate::error::{IntegrationError, Result};
use crate::registry::{EntityRegistry, EntityType};

/// An identifier that has passed normalization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether this canonical form is a stable ID for its type (as opposed
    /// to a free-form name routed through the name-lookup channel).
    pub fn is_id_for(&self, ty: EntityType, registry: &EntityRegistry) -> bool {
        match registry.descriptor(ty).and_then(|d| d.id_prefix) {
            Some(prefix) => self.0.starts_with(prefix),
            None => false,
        }
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize one identifier for its declared type.
///
/// # Errors
///
/// `IntegrationError::Validation` when the identifier claims the type's
/// prefix but fails the suffix format check, or is empty.
pub fn normalize(raw: &str, ty: EntityType, registry: &EntityRegistry) -> Result<CanonicalId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IntegrationError::validation(raw, ty, "empty identifier"));
    }

    let prefix = registry.descriptor(ty).and_then(|d| d.id_prefix);
    let canonical = match (ty, prefix) {
        // Genes are symbols: uppercase, no ID space.
        (EntityType::Gene, _) | (_, None) => trimmed.to_uppercase(),

        (EntityType::Drug, Some(prefix)) => {
            if let Some(suffix) = strip_prefix_ci(trimmed, prefix) {
                let suffix = suffix.to_string();
                if suffix.len() == 5 && all_digits(&suffix) {
                    format!("{prefix}{suffix}")
                } else {
                    return Err(IntegrationError::validation(
                        raw,
                        ty,
                        "DrugBank IDs are DB followed by five digits",
                    ));
                }
            } else {
                // A drug name, not an ID claim.
                trimmed.to_string()
            }
        }

        (EntityType::Pathway, Some(prefix)) => {
            if let Some(suffix) = strip_prefix_ci(trimmed, prefix) {
                format!("{prefix}{suffix}")
            } else if all_digits(trimmed) {
                format!("{prefix}{trimmed}")
            } else {
                // Reactome identifiers are inconsistently prefixed in the
                // source data; tolerate free-form here.
                trimmed.to_string()
            }
        }

        // MONDO / UBERON / GO: digits-only suffix.
        (_, Some(prefix)) => {
            if let Some(suffix) = strip_prefix_ci(trimmed, prefix) {
                let suffix = suffix.to_string();
                if !suffix.is_empty() && all_digits(&suffix) {
                    format!("{prefix}{suffix}")
                } else {
                    return Err(IntegrationError::validation(
                        raw,
                        ty,
                        format!("{prefix} suffix must be digits"),
                    ));
                }
            } else if all_digits(trimmed) {
                format!("{prefix}{trimmed}")
            } else {
                // Free-form name; looked up by label, not by ID.
                trimmed.to_string()
            }
        }
    };

    Ok(CanonicalId(canonical))
}

/// Normalize a batch, deduplicating after canonicalization. Order is not
/// preserved.
///
/// Under [`TypePolicy::Lenient`] malformed entries are dropped with a
/// warning; under [`TypePolicy::Strict`] the first malformed entry fails
/// the batch.
pub fn normalize_batch(
    raws: &[String],
    ty: EntityType,
    registry: &EntityRegistry,
    policy: TypePolicy,
) -> Result<BTreeSet<CanonicalId>> {
    let mut out = BTreeSet::new();
    for raw in raws {
        match normalize(raw, ty, registry) {
            Ok(id) => {
                out.insert(id);
            }
            Err(err) if policy == TypePolicy::Lenient => {
                warn!(identifier = %raw, entity_type = %ty, %err, "dropping malformed identifier");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(out)
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg() -> EntityRegistry {
        EntityRegistry::builtin()
    }

    fn norm(raw: &str, ty: EntityType) -> String {
        normalize(raw, ty, &reg()).unwrap().into_string()
    }

    #[test]
    fn gene_symbols_are_uppercased_and_trimmed() {
        assert_eq!(norm(" tp53 ", EntityType::Gene), "TP53");
        assert_eq!(norm("BRCA1", EntityType::Gene), "BRCA1");
    }

    #[test]
    fn mondo_prefix_is_added_to_bare_digits() {
        assert_eq!(norm("0004992", EntityType::Disease), "MONDO:0004992");
        assert_eq!(norm("MONDO:0004992", EntityType::Disease), "MONDO:0004992");
    }

    #[test]
    fn mondo_bad_suffix_is_rejected() {
        let err = normalize("MONDO:abc", EntityType::Disease, &reg()).unwrap_err();
        assert!(matches!(err, IntegrationError::Validation { .. }));
    }

    #[test]
    fn disease_names_pass_through_as_names() {
        let id = normalize("breast cancer", EntityType::Disease, &reg()).unwrap();
        assert_eq!(id.as_str(), "breast cancer");
        assert!(!id.is_id_for(EntityType::Disease, &reg()));
    }

    #[test]
    fn drugbank_requires_five_digits() {
        assert_eq!(norm("DB00945", EntityType::Drug), "DB00945");
        assert_eq!(norm("db00945", EntityType::Drug), "DB00945");
        assert!(normalize("DB945", EntityType::Drug, &reg()).is_err());
        assert!(normalize("DB0094500", EntityType::Drug, &reg()).is_err());
        // Not an ID claim: a drug name.
        assert_eq!(norm("Aspirin", EntityType::Drug), "Aspirin");
    }

    #[test]
    fn reactome_is_prefixed_when_numeric_and_free_form_otherwise() {
        assert_eq!(norm("109581", EntityType::Pathway), "R-HSA-109581");
        assert_eq!(norm("R-HSA-109581", EntityType::Pathway), "R-HSA-109581");
        assert_eq!(norm("Apoptosis", EntityType::Pathway), "Apoptosis");
    }

    #[test]
    fn go_ids_validate_like_mondo() {
        assert_eq!(
            norm("GO:0006915", EntityType::BiologicalProcess),
            "GO:0006915"
        );
        assert!(normalize("GO:6915x", EntityType::MolecularFunction, &reg()).is_err());
    }

    #[test]
    fn normalize_is_idempotent() {
        let cases = [
            ("tp53", EntityType::Gene),
            ("0004992", EntityType::Disease),
            ("MONDO:0004992", EntityType::Disease),
            ("DB00945", EntityType::Drug),
            ("109581", EntityType::Pathway),
            ("breast cancer", EntityType::Disease),
        ];
        let reg = reg();
        for (raw, ty) in cases {
            let once = normalize(raw, ty, &reg).unwrap();
            let twice = normalize(once.as_str(), ty, &reg).unwrap();
            assert_eq!(once, twice, "normalize not idempotent for {raw:?}");
        }
    }

    #[test]
    fn batch_deduplicates_case_variants() {
        let raws = vec!["TP53".to_string(), "tp53".to_string(), "BRCA1".to_string()];
        let out =
            normalize_batch(&raws, EntityType::Gene, &reg(), TypePolicy::Lenient).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn batch_policy_controls_malformed_handling() {
        let raws = vec!["MONDO:0004992".to_string(), "MONDO:xyz".to_string()];
        let lenient =
            normalize_batch(&raws, EntityType::Disease, &reg(), TypePolicy::Lenient).unwrap();
        assert_eq!(lenient.len(), 1);

        let strict = normalize_batch(&raws, EntityType::Disease, &reg(), TypePolicy::Strict);
        assert!(strict.is_err());
    }

    #[test]
    fn empty_identifier_is_always_invalid() {
        assert!(normalize("   ", EntityType::Gene, &reg()).is_err());
    }
}
