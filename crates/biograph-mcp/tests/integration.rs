//! End-to-end handler tests over scripted backends.
//!
//! Each test drives `Handlers::dispatch` with raw JSON-RPC requests and
//! asserts on the MCP content payloads, the same surface an MCP client
//! sees.

use std::sync::Arc;

use serde_json::{json, Value};

use biograph_core::testing::{row, FakePrimeKg, FakeTripleStore};
use biograph_core::{Config, EntityRegistry};
use biograph_mcp::handlers::Handlers;
use biograph_mcp::protocol::{error_codes, methods, JsonRpcId, JsonRpcRequest};

fn handlers(pk: FakePrimeKg, gl: FakeTripleStore) -> Handlers {
    Handlers::new(
        Arc::new(EntityRegistry::builtin()),
        Arc::new(pk),
        Arc::new(gl),
        Config::default(),
    )
}

fn request(method: &str, params: Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(JsonRpcId::Number(1)),
        method: method.to_string(),
        params: Some(params),
    }
}

/// Call a tool and return its parsed text payload plus the isError flag.
async fn call_tool(h: &Handlers, name: &str, args: Value) -> (Value, bool) {
    let resp = h
        .dispatch(request(
            methods::TOOLS_CALL,
            json!({ "name": name, "arguments": args }),
        ))
        .await;
    let result = resp.result.expect("tool calls produce results");
    let is_error = result["isError"].as_bool().expect("isError flag");
    let text = result["content"][0]["text"]
        .as_str()
        .expect("text content")
        .to_string();
    let payload = serde_json::from_str(&text).unwrap_or(Value::String(text));
    (payload, is_error)
}

#[tokio::test]
async fn initialize_reports_server_info_and_tool_capability() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let resp = h.dispatch(request(methods::INITIALIZE, json!({}))).await;
    let result = resp.result.unwrap();
    assert_eq!(result["protocolVersion"], json!("2024-11-05"));
    assert_eq!(result["serverInfo"]["name"], json!("biograph-mcp"));
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn tools_list_exposes_all_twelve_tools() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let resp = h.dispatch(request(methods::TOOLS_LIST, json!({}))).await;
    let tools = resp.result.unwrap()["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), 12);
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    assert!(names.contains(&"find_common_nodes"));
    assert!(names.contains(&"find_drug_disease_mechanisms"));
    assert!(names.contains(&"find_sdoh_by_location"));
}

#[tokio::test]
async fn unknown_method_is_a_protocol_error() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let resp = h.dispatch(request("tools/unknown", json!({}))).await;
    assert_eq!(resp.error.unwrap().code, error_codes::METHOD_NOT_FOUND);
}

#[tokio::test]
async fn unknown_tool_is_a_protocol_error() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let resp = h
        .dispatch(request(
            methods::TOOLS_CALL,
            json!({ "name": "no_such_tool", "arguments": {} }),
        ))
        .await;
    assert_eq!(resp.error.unwrap().code, error_codes::TOOL_NOT_FOUND);
}

#[tokio::test]
async fn get_schema_lists_entity_types() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let (payload, is_error) = call_tool(&h, "get_schema", json!({})).await;
    assert!(!is_error);
    let text = payload.as_str().unwrap();
    assert!(text.contains("GENES"));
    assert!(text.contains("MONDO"));
}

#[tokio::test]
async fn find_common_nodes_partitions_identifiers() {
    let pk = FakePrimeKg::new().on(
        &["MATCH (n:`gene/protein`)"],
        vec![row(&[("name", "TP53"), ("id", "TP53")])],
    );
    let gl = FakeTripleStore::new().on(
        &["schema:Gene", "gene_symbol"],
        vec![row(&[("id", "TP53")])],
    );
    let h = handlers(pk, gl);

    let (payload, is_error) = call_tool(
        &h,
        "find_common_nodes",
        json!({ "entities": { "genes": ["tp53", "NOPE999"] } }),
    )
    .await;
    assert!(!is_error);
    assert_eq!(payload["found_in_both"]["genes"], json!(["TP53"]));
    assert_eq!(payload["not_found"]["genes"], json!(["NOPE999"]));
    assert_eq!(payload["summary"]["total_queried"], json!(2));
}

#[tokio::test]
async fn find_common_nodes_requires_entities() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let (_, is_error) = call_tool(&h, "find_common_nodes", json!({})).await;
    assert!(is_error);
    let (_, is_error) = call_tool(&h, "find_common_nodes", json!({ "entities": {} })).await;
    assert!(is_error);
}

#[tokio::test]
async fn enrich_genes_only_queries_enabled_channels() {
    let pk = Arc::new(FakePrimeKg::new().on(
        &["drug_protein"],
        vec![row(&[
            ("source", "TP53"),
            ("source_id", "7157"),
            ("name", "Doxorubicin"),
            ("id", "DB00997"),
        ])],
    ));
    let h = Handlers::new(
        Arc::new(EntityRegistry::builtin()),
        pk.clone(),
        Arc::new(FakeTripleStore::new()),
        Config::default(),
    );

    let (payload, is_error) = call_tool(
        &h,
        "enrich_genes",
        json!({
            "gene_names": ["TP53"],
            "include_diseases": false,
            "include_pathways": false,
            "include_go_terms": false,
            "include_anatomy": false
        }),
    )
    .await;
    assert!(!is_error);

    let calls = pk.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.contains("drug_protein"));

    let record = &payload["records"][0];
    assert_eq!(record["entity"], json!("TP53"));
    assert_eq!(record["related"]["drugs"][0]["name"], json!("Doxorubicin"));
}

#[tokio::test]
async fn enrich_entities_rejects_out_of_range_depth() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let (payload, is_error) = call_tool(
        &h,
        "enrich_entities",
        json!({ "entities": { "genes": ["TP53"] }, "depth": 5 }),
    )
    .await;
    assert!(is_error);
    assert!(payload.as_str().unwrap().contains("depth"));
}

#[tokio::test]
async fn mechanism_report_scores_a_direct_indication() {
    let pk = FakePrimeKg::new().on(
        &["[:indication]"],
        vec![row(&[("drug_name", "Aspirin"), ("disease_name", "stroke")])],
    );
    let h = handlers(pk, FakeTripleStore::new());

    let (payload, is_error) = call_tool(
        &h,
        "find_drug_disease_mechanisms",
        json!({ "drug": "aspirin", "disease": "stroke" }),
    )
    .await;
    assert!(!is_error);
    assert_eq!(payload["direct_indication"], json!(true));
    let strength = payload["evidence_strength"].as_f64().unwrap();
    assert!((strength - 0.4).abs() < 1e-9);
}

#[tokio::test]
async fn mechanism_disabled_channels_are_null() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let (payload, is_error) = call_tool(
        &h,
        "find_drug_disease_mechanisms",
        json!({
            "drug": "aspirin",
            "disease": "stroke",
            "include_anatomy": false,
            "include_pathways": false
        }),
    )
    .await;
    assert!(!is_error);
    assert!(payload["anatomical_context"].is_null());
    assert!(payload["pathway_mechanisms"].is_null());
}

#[tokio::test]
async fn compare_gene_sets_reports_overlap_and_jaccard() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let (payload, is_error) = call_tool(
        &h,
        "compare_gene_sets",
        json!({
            "set1": ["TP53", "BRCA1"],
            "set2": ["brca1", "EGFR"],
            "set1_name": "tumor",
            "set2_name": "control"
        }),
    )
    .await;
    assert!(!is_error);
    assert_eq!(payload["set1_name"], json!("tumor"));
    assert_eq!(payload["overlap"], json!(["BRCA1"]));
    let jaccard = payload["jaccard_index"].as_f64().unwrap();
    assert!((jaccard - 1.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn find_genes_in_anatomy_validates_expression() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let (payload, is_error) = call_tool(
        &h,
        "find_genes_in_anatomy",
        json!({ "anatomy_ids": ["UBERON:0000955"], "expression": "sideways" }),
    )
    .await;
    assert!(is_error);
    assert!(payload.as_str().unwrap().contains("expression"));
}

#[tokio::test]
async fn find_genes_in_anatomy_returns_grouped_rows() {
    let pk = FakePrimeKg::new().on(
        &["anatomy_protein_present"],
        vec![biograph_core::testing::json_row(json!({
            "anatomy_name": "brain",
            "anatomy_id": "UBERON:0000955",
            "genes": ["GFAP", "MBP"],
            "gene_count": 2
        }))],
    );
    let h = handlers(pk, FakeTripleStore::new());

    let (payload, is_error) = call_tool(
        &h,
        "find_genes_in_anatomy",
        json!({ "anatomy_ids": ["UBERON:0000955"] }),
    )
    .await;
    assert!(!is_error);
    assert_eq!(payload["count"], json!(1));
    assert_eq!(payload["locations"][0]["anatomy_name"], json!("brain"));
}

#[tokio::test]
async fn find_drugs_for_pathway_enforces_limit_bounds() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let (_, is_error) = call_tool(
        &h,
        "find_drugs_for_pathway",
        json!({ "pathway_ids": ["R-HSA-109582"], "limit": 0 }),
    )
    .await;
    assert!(is_error);
    let (_, is_error) = call_tool(
        &h,
        "find_drugs_for_pathway",
        json!({ "pathway_ids": ["R-HSA-109582"], "limit": 999 }),
    )
    .await;
    assert!(is_error);
}

#[tokio::test]
async fn common_pathways_requires_at_least_two_diseases() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let (_, is_error) = call_tool(
        &h,
        "find_common_pathways_across_diseases",
        json!({ "disease_ids": ["MONDO:0007254"] }),
    )
    .await;
    assert!(is_error);
}

#[tokio::test]
async fn disease_prevalence_renders_filters_into_the_query() {
    let gl = Arc::new(FakeTripleStore::new().on(
        &["PREVALENCE_DpL", "\"asthma\"", "\"Ohio\""],
        vec![row(&[
            ("disease_name", "asthma"),
            ("location_name", "Ohio"),
            ("prevalence", "0.081"),
            ("year", "2021"),
        ])],
    ));
    let h = Handlers::new(
        Arc::new(EntityRegistry::builtin()),
        Arc::new(FakePrimeKg::new()),
        gl.clone(),
        Config::default(),
    );

    let (payload, is_error) = call_tool(
        &h,
        "find_disease_prevalence",
        json!({ "disease_name": "asthma", "location": "Ohio" }),
    )
    .await;
    assert!(!is_error);
    assert_eq!(payload["count"], json!(1));
    assert_eq!(payload["observations"][0]["prevalence"], json!("0.081"));

    let calls = gl.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("LIMIT 50"));
}

#[tokio::test]
async fn disease_prevalence_rejects_unquotable_filters() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let (payload, is_error) = call_tool(
        &h,
        "find_disease_prevalence",
        json!({ "disease_name": "asthma\" } UNION { ?x ?y ?z }", "location": "Ohio" }),
    )
    .await;
    assert!(is_error);
    assert!(payload.as_str().unwrap().contains("-32602"));
}

#[tokio::test]
async fn sdoh_by_location_returns_observations() {
    let gl = FakeTripleStore::new().on(
        &["PREVALENCEIN_SpL", "\"Franklin County\""],
        vec![row(&[
            ("sdoh_name", "median household income"),
            ("location_name", "Franklin County"),
            ("value", "61305"),
            ("year", "2020"),
        ])],
    );
    let h = handlers(FakePrimeKg::new(), gl);

    let (payload, is_error) = call_tool(
        &h,
        "find_sdoh_by_location",
        json!({ "location": "Franklin County" }),
    )
    .await;
    assert!(!is_error);
    assert_eq!(payload["count"], json!(1));
    assert_eq!(
        payload["observations"][0]["sdoh_name"],
        json!("median household income")
    );
}

#[tokio::test]
async fn backend_failure_surfaces_as_tool_error_with_code() {
    let pk = FakePrimeKg::failing("connection refused");
    let h = handlers(pk, FakeTripleStore::new());
    let (payload, is_error) = call_tool(
        &h,
        "find_disease_pathways",
        json!({ "disease_ids": ["MONDO:0007254"] }),
    )
    .await;
    assert!(is_error);
    let text = payload.as_str().unwrap();
    assert!(text.contains("-32010"));
    assert!(text.contains("connection refused"));
}

#[tokio::test]
async fn invalid_arguments_are_tool_errors_not_protocol_errors() {
    let h = handlers(FakePrimeKg::new(), FakeTripleStore::new());
    let resp = h
        .dispatch(request(
            methods::TOOLS_CALL,
            json!({ "name": "enrich_genes", "arguments": { "gene_names": "TP53" } }),
        ))
        .await;
    assert!(resp.error.is_none());
    let result = resp.result.unwrap();
    assert_eq!(result["isError"], json!(true));
}
