//! Drug-disease mechanism tool handler.

use serde::Deserialize;
use serde_json::Value;

use biograph_core::MechanismOptions;

use crate::protocol::{JsonRpcId, JsonRpcResponse};
use crate::tools::names;

use super::super::Handlers;

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct FindMechanismsRequest {
    drug: String,
    disease: String,
    #[serde(default = "default_true")]
    include_direct: bool,
    #[serde(default = "default_true")]
    include_gene_targets: bool,
    #[serde(default = "default_true")]
    include_pathways: bool,
    #[serde(default = "default_true")]
    include_anatomy: bool,
}

impl Handlers {
    /// find_drug_disease_mechanisms: mechanistic evidence channels plus a
    /// composite evidence strength.
    pub(super) async fn call_find_drug_disease_mechanisms(
        &self,
        id: Option<JsonRpcId>,
        args: Value,
    ) -> JsonRpcResponse {
        let req: FindMechanismsRequest =
            match self.parse_args(id.clone(), args, names::FIND_DRUG_DISEASE_MECHANISMS) {
                Ok(req) => req,
                Err(resp) => return resp,
            };
        let opts = MechanismOptions {
            include_direct: req.include_direct,
            include_gene_targets: req.include_gene_targets,
            include_pathways: req.include_pathways,
            include_anatomy: req.include_anatomy,
        };
        match self
            .composer
            .find_mechanisms(&req.drug, &req.disease, opts)
            .await
        {
            Ok(report) => self.tool_result(id, report),
            Err(err) => self.tool_failure(id, names::FIND_DRUG_DISEASE_MECHANISMS, &err),
        }
    }
}
