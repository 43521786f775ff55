//! PrimeKG analysis tool handlers.
//!
//! These tools run fixed traversal queries and return the rows mostly as
//! the backend shaped them; identifier handling (normalization, id/name
//! split) follows the same rules as resolution.

use serde::Deserialize;
use serde_json::{json, Value};

use biograph_core::backend::{with_timeout, GraphSource, Row};
use biograph_core::normalize::normalize_batch;
use biograph_core::queries::cypher;
use biograph_core::{EntityType, IntegrationError};

use crate::protocol::{JsonRpcId, JsonRpcResponse};
use crate::tools::names;

use super::super::Handlers;

fn default_min_genes() -> u64 {
    2
}

fn default_min_diseases() -> u64 {
    2
}

fn default_limit() -> u64 {
    25
}

fn default_expression() -> String {
    "present".to_string()
}

#[derive(Deserialize)]
struct GenesInAnatomyRequest {
    anatomy_ids: Vec<String>,
    #[serde(default = "default_expression")]
    expression: String,
}

#[derive(Deserialize)]
struct DiseasePathwaysRequest {
    disease_ids: Vec<String>,
    #[serde(default = "default_min_genes")]
    min_genes: u64,
}

#[derive(Deserialize)]
struct DrugsForPathwayRequest {
    pathway_ids: Vec<String>,
    #[serde(default = "default_limit")]
    limit: u64,
}

#[derive(Deserialize)]
struct CommonPathwaysRequest {
    disease_ids: Vec<String>,
    #[serde(default = "default_min_diseases")]
    min_diseases: u64,
}

impl Handlers {
    /// Normalize a raw identifier batch and split it into canonical IDs and
    /// names, matching the `$ids` / `$names` clauses of the analysis queries.
    fn split_ids_names(
        &self,
        raws: &[String],
        ty: EntityType,
    ) -> Result<(Vec<String>, Vec<String>), IntegrationError> {
        let canon = normalize_batch(raws, ty, &self.registry, self.config.type_policy)?;
        let mut ids = Vec::new();
        let mut names = Vec::new();
        for c in canon {
            if c.is_id_for(ty, &self.registry) {
                ids.push(c.into_string());
            } else {
                names.push(c.into_string());
            }
        }
        Ok((ids, names))
    }

    async fn run_primekg(&self, query: &str, params: Value) -> Result<Vec<Row>, IntegrationError> {
        with_timeout(
            GraphSource::PrimeKg,
            self.config.query_timeout,
            self.primekg.query(query, params),
        )
        .await
    }

    /// find_genes_in_anatomy: genes expressed or absent per anatomy.
    pub(super) async fn call_find_genes_in_anatomy(
        &self,
        id: Option<JsonRpcId>,
        args: Value,
    ) -> JsonRpcResponse {
        let req: GenesInAnatomyRequest =
            match self.parse_args(id.clone(), args, names::FIND_GENES_IN_ANATOMY) {
                Ok(req) => req,
                Err(resp) => return resp,
            };
        let present = match req.expression.as_str() {
            "present" => true,
            "absent" => false,
            other => {
                return self.tool_error(
                    id,
                    &format!("expression must be 'present' or 'absent', got {other:?}"),
                )
            }
        };
        if req.anatomy_ids.is_empty() {
            return self.tool_error(id, "anatomy_ids must not be empty");
        }
        let (ids, names_) = match self.split_ids_names(&req.anatomy_ids, EntityType::Anatomy) {
            Ok(split) => split,
            Err(err) => return self.tool_failure(id, names::FIND_GENES_IN_ANATOMY, &err),
        };
        let params = json!({ "ids": ids, "names": names_ });
        match self
            .run_primekg(cypher::genes_in_anatomy(present), params)
            .await
        {
            Ok(rows) => {
                let count = rows.len();
                self.tool_result(
                    id,
                    json!({
                        "expression": req.expression,
                        "locations": rows,
                        "count": count
                    }),
                )
            }
            Err(err) => self.tool_failure(id, names::FIND_GENES_IN_ANATOMY, &err),
        }
    }

    /// find_disease_pathways: pathways linked to diseases through genes.
    pub(super) async fn call_find_disease_pathways(
        &self,
        id: Option<JsonRpcId>,
        args: Value,
    ) -> JsonRpcResponse {
        let req: DiseasePathwaysRequest =
            match self.parse_args(id.clone(), args, names::FIND_DISEASE_PATHWAYS) {
                Ok(req) => req,
                Err(resp) => return resp,
            };
        if req.disease_ids.is_empty() {
            return self.tool_error(id, "disease_ids must not be empty");
        }
        if req.min_genes == 0 {
            return self.tool_error(id, "min_genes must be at least 1");
        }
        let (ids, names_) = match self.split_ids_names(&req.disease_ids, EntityType::Disease) {
            Ok(split) => split,
            Err(err) => return self.tool_failure(id, names::FIND_DISEASE_PATHWAYS, &err),
        };
        let params = json!({ "ids": ids, "names": names_, "min_genes": req.min_genes });
        match self.run_primekg(cypher::DISEASE_PATHWAYS, params).await {
            Ok(rows) => {
                let count = rows.len();
                self.tool_result(id, json!({ "associations": rows, "count": count }))
            }
            Err(err) => self.tool_failure(id, names::FIND_DISEASE_PATHWAYS, &err),
        }
    }

    /// find_drugs_for_pathway: drugs ranked by targeted pathway genes.
    pub(super) async fn call_find_drugs_for_pathway(
        &self,
        id: Option<JsonRpcId>,
        args: Value,
    ) -> JsonRpcResponse {
        let req: DrugsForPathwayRequest =
            match self.parse_args(id.clone(), args, names::FIND_DRUGS_FOR_PATHWAY) {
                Ok(req) => req,
                Err(resp) => return resp,
            };
        if req.pathway_ids.is_empty() {
            return self.tool_error(id, "pathway_ids must not be empty");
        }
        if req.limit == 0 || req.limit > 200 {
            return self.tool_error(id, "limit must be between 1 and 200");
        }
        let (ids, names_) = match self.split_ids_names(&req.pathway_ids, EntityType::Pathway) {
            Ok(split) => split,
            Err(err) => return self.tool_failure(id, names::FIND_DRUGS_FOR_PATHWAY, &err),
        };
        let params = json!({ "ids": ids, "names": names_, "limit": req.limit });
        match self.run_primekg(cypher::DRUGS_FOR_PATHWAY, params).await {
            Ok(rows) => {
                let count = rows.len();
                self.tool_result(id, json!({ "drugs": rows, "count": count }))
            }
            Err(err) => self.tool_failure(id, names::FIND_DRUGS_FOR_PATHWAY, &err),
        }
    }

    /// find_common_pathways_across_diseases: shared pathways with the genes
    /// connecting them.
    pub(super) async fn call_find_common_pathways_across_diseases(
        &self,
        id: Option<JsonRpcId>,
        args: Value,
    ) -> JsonRpcResponse {
        let req: CommonPathwaysRequest =
            match self.parse_args(id.clone(), args, names::FIND_COMMON_PATHWAYS_ACROSS_DISEASES) {
                Ok(req) => req,
                Err(resp) => return resp,
            };
        if req.disease_ids.len() < 2 {
            return self.tool_error(id, "disease_ids must name at least two diseases");
        }
        if req.min_diseases < 2 {
            return self.tool_error(id, "min_diseases must be at least 2");
        }
        let (ids, names_) = match self.split_ids_names(&req.disease_ids, EntityType::Disease) {
            Ok(split) => split,
            Err(err) => {
                return self.tool_failure(id, names::FIND_COMMON_PATHWAYS_ACROSS_DISEASES, &err)
            }
        };
        let params = json!({ "ids": ids, "names": names_, "min_diseases": req.min_diseases });
        match self
            .run_primekg(cypher::COMMON_PATHWAYS_ACROSS_DISEASES, params)
            .await
        {
            Ok(rows) => {
                let count = rows.len();
                self.tool_result(id, json!({ "pathways": rows, "count": count }))
            }
            Err(err) => self.tool_failure(id, names::FIND_COMMON_PATHWAYS_ACROSS_DISEASES, &err),
        }
    }
}
