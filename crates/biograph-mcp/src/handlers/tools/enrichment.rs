//! Enrichment and gene-set comparison tool handlers.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use biograph_core::{GeneChannels, HopDepth};

use crate::protocol::{JsonRpcId, JsonRpcResponse};
use crate::tools::names;

use super::super::Handlers;

fn default_depth() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

fn default_set1_name() -> String {
    "set1".to_string()
}

fn default_set2_name() -> String {
    "set2".to_string()
}

#[derive(Deserialize)]
struct EnrichEntitiesRequest {
    entities: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_depth")]
    depth: u8,
}

#[derive(Deserialize)]
struct EnrichGenesRequest {
    gene_names: Vec<String>,
    #[serde(default = "default_true")]
    include_drugs: bool,
    #[serde(default = "default_true")]
    include_diseases: bool,
    #[serde(default = "default_true")]
    include_pathways: bool,
    #[serde(default = "default_true")]
    include_go_terms: bool,
    #[serde(default = "default_true")]
    include_anatomy: bool,
}

#[derive(Deserialize)]
struct CompareGeneSetsRequest {
    set1: Vec<String>,
    set2: Vec<String>,
    #[serde(default = "default_set1_name")]
    set1_name: String,
    #[serde(default = "default_set2_name")]
    set2_name: String,
}

impl Handlers {
    /// enrich_entities: multi-hop neighborhood expansion for typed batches.
    pub(super) async fn call_enrich_entities(
        &self,
        id: Option<JsonRpcId>,
        args: Value,
    ) -> JsonRpcResponse {
        let req: EnrichEntitiesRequest =
            match self.parse_args(id.clone(), args, names::ENRICH_ENTITIES) {
                Ok(req) => req,
                Err(resp) => return resp,
            };
        let Some(depth) = HopDepth::new(req.depth) else {
            return self.tool_error(id, "depth must be between 1 and 3");
        };
        if req.entities.is_empty() {
            return self.tool_error(id, "entities must not be empty");
        }
        match self.engine.enrich(&req.entities, depth).await {
            Ok(outcome) => self.tool_result(id, outcome),
            Err(err) => self.tool_failure(id, names::ENRICH_ENTITIES, &err),
        }
    }

    /// enrich_genes: single-hop gene enrichment with channel toggles.
    pub(super) async fn call_enrich_genes(
        &self,
        id: Option<JsonRpcId>,
        args: Value,
    ) -> JsonRpcResponse {
        let req: EnrichGenesRequest = match self.parse_args(id.clone(), args, names::ENRICH_GENES) {
            Ok(req) => req,
            Err(resp) => return resp,
        };
        if req.gene_names.is_empty() {
            return self.tool_error(id, "gene_names must not be empty");
        }
        let channels = GeneChannels {
            drugs: req.include_drugs,
            diseases: req.include_diseases,
            pathways: req.include_pathways,
            go_terms: req.include_go_terms,
            anatomy: req.include_anatomy,
        };
        match self.engine.enrich_genes(&req.gene_names, channels).await {
            Ok(outcome) => self.tool_result(id, outcome),
            Err(err) => self.tool_failure(id, names::ENRICH_GENES, &err),
        }
    }

    /// compare_gene_sets: overlap arithmetic plus shared annotations.
    pub(super) async fn call_compare_gene_sets(
        &self,
        id: Option<JsonRpcId>,
        args: Value,
    ) -> JsonRpcResponse {
        let req: CompareGeneSetsRequest =
            match self.parse_args(id.clone(), args, names::COMPARE_GENE_SETS) {
                Ok(req) => req,
                Err(resp) => return resp,
            };
        match self
            .comparator
            .compare(&req.set1, &req.set2, &req.set1_name, &req.set2_name)
            .await
        {
            Ok(comparison) => self.tool_result(id, comparison),
            Err(err) => self.tool_failure(id, names::COMPARE_GENE_SETS, &err),
        }
    }
}
