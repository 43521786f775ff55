//! Geospatial and social-determinants tool handlers.
//!
//! Both tools are backed by the triple store. User-supplied filter strings
//! go through `sparql::substitute`, which rejects anything that cannot be
//! quoted safely.

use serde::Deserialize;
use serde_json::{json, Value};

use biograph_core::backend::{with_timeout, GraphSource, Row};
use biograph_core::queries::sparql::{self, SparqlValue};
use biograph_core::IntegrationError;

use crate::protocol::{JsonRpcId, JsonRpcResponse};
use crate::tools::names;

use super::super::Handlers;

fn default_limit() -> u64 {
    50
}

#[derive(Deserialize)]
struct DiseasePrevalenceRequest {
    disease_name: String,
    location: String,
    #[serde(default = "default_limit")]
    limit: u64,
}

#[derive(Deserialize)]
struct SdohByLocationRequest {
    location: String,
    #[serde(default = "default_limit")]
    limit: u64,
}

impl Handlers {
    async fn run_genelab(&self, query: &str) -> Result<Vec<Row>, IntegrationError> {
        with_timeout(
            GraphSource::GeneLab,
            self.config.query_timeout,
            self.genelab.query(query),
        )
        .await
    }

    /// find_disease_prevalence: prevalence observations filtered by disease
    /// and location name.
    pub(super) async fn call_find_disease_prevalence(
        &self,
        id: Option<JsonRpcId>,
        args: Value,
    ) -> JsonRpcResponse {
        let req: DiseasePrevalenceRequest =
            match self.parse_args(id.clone(), args, names::FIND_DISEASE_PREVALENCE) {
                Ok(req) => req,
                Err(resp) => return resp,
            };
        if req.limit == 0 || req.limit > 500 {
            return self.tool_error(id, "limit must be between 1 and 500");
        }
        let query = match sparql::substitute(
            sparql::DISEASE_PREVALENCE_BY_LOCATION,
            &[
                ("disease_query", SparqlValue::Str(req.disease_name.clone())),
                ("location_query", SparqlValue::Str(req.location.clone())),
                ("limit", SparqlValue::Int(req.limit as i64)),
            ],
        ) {
            Ok(query) => query,
            Err(err) => return self.tool_failure(id, names::FIND_DISEASE_PREVALENCE, &err),
        };
        match self.run_genelab(&query).await {
            Ok(rows) => {
                let count = rows.len();
                self.tool_result(id, json!({ "observations": rows, "count": count }))
            }
            Err(err) => self.tool_failure(id, names::FIND_DISEASE_PREVALENCE, &err),
        }
    }

    /// find_sdoh_by_location: social-determinants observations for a
    /// location.
    pub(super) async fn call_find_sdoh_by_location(
        &self,
        id: Option<JsonRpcId>,
        args: Value,
    ) -> JsonRpcResponse {
        let req: SdohByLocationRequest =
            match self.parse_args(id.clone(), args, names::FIND_SDOH_BY_LOCATION) {
                Ok(req) => req,
                Err(resp) => return resp,
            };
        if req.limit == 0 || req.limit > 500 {
            return self.tool_error(id, "limit must be between 1 and 500");
        }
        let query = match sparql::substitute(
            sparql::SDOH_BY_LOCATION,
            &[
                ("location_query", SparqlValue::Str(req.location.clone())),
                ("limit", SparqlValue::Int(req.limit as i64)),
            ],
        ) {
            Ok(query) => query,
            Err(err) => return self.tool_failure(id, names::FIND_SDOH_BY_LOCATION, &err),
        };
        match self.run_genelab(&query).await {
            Ok(rows) => {
                let count = rows.len();
                self.tool_result(id, json!({ "observations": rows, "count": count }))
            }
            Err(err) => self.tool_failure(id, names::FIND_SDOH_BY_LOCATION, &err),
        }
    }
}
