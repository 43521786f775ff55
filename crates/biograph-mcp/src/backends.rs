//! HTTP adapters for the external graph engines.
//!
//! PrimeKG is reached through a Neo4j-compatible transactional HTTP
//! endpoint; GeneLab through a standard SPARQL endpoint speaking
//! `application/sparql-results+json`. Both adapters translate wire payloads
//! into [`Row`] maps and surface engine-reported errors as
//! [`BackendError`]s.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::{json, Value};
use tracing::debug;

use biograph_core::backend::{GraphSource, PropertyGraph, Row, TripleStore};
use biograph_core::BackendError;

/// Property-graph adapter for a Neo4j-style transactional HTTP endpoint.
pub struct HttpPropertyGraph {
    client: HttpClient,
    endpoint: String,
}

impl HttpPropertyGraph {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("building PrimeKG HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl PropertyGraph for HttpPropertyGraph {
    async fn query(&self, query: &str, params: Value) -> Result<Vec<Row>, BackendError> {
        let body = json!({
            "statements": [{ "statement": query, "parameters": params }]
        });
        debug!(endpoint = %self.endpoint, "submitting cypher statement");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::new(GraphSource::PrimeKg, format!("request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::new(
                GraphSource::PrimeKg,
                format!("endpoint returned HTTP {status}"),
            ));
        }
        let payload: Value = response.json().await.map_err(|e| {
            BackendError::new(GraphSource::PrimeKg, format!("malformed response body: {e}"))
        })?;
        parse_statement_rows(&payload).map_err(|msg| BackendError::new(GraphSource::PrimeKg, msg))
    }
}

/// Extract rows from a transactional-endpoint response, honoring its
/// in-band `errors` array.
fn parse_statement_rows(payload: &Value) -> Result<Vec<Row>, String> {
    if let Some(first) = payload
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
    {
        let message = first
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unspecified engine error");
        return Err(message.to_string());
    }

    let Some(result) = payload.pointer("/results/0") else {
        return Ok(Vec::new());
    };
    let columns: Vec<String> = result
        .get("columns")
        .and_then(Value::as_array)
        .map(|cols| {
            cols.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let empty = Vec::new();
    let data = result.get("data").and_then(Value::as_array).unwrap_or(&empty);
    let mut rows = Vec::with_capacity(data.len());
    for entry in data {
        let Some(values) = entry.get("row").and_then(Value::as_array) else {
            continue;
        };
        let row: Row = columns
            .iter()
            .cloned()
            .zip(values.iter().cloned())
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Triple-store adapter for a SPARQL HTTP endpoint.
pub struct SparqlHttpStore {
    client: HttpClient,
    endpoint: String,
}

impl SparqlHttpStore {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("building GeneLab HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl TripleStore for SparqlHttpStore {
    async fn query(&self, query: &str) -> Result<Vec<Row>, BackendError> {
        debug!(endpoint = %self.endpoint, "submitting sparql query");
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/sparql-query")
            .header("Accept", "application/sparql-results+json")
            .body(query.to_string())
            .send()
            .await
            .map_err(|e| BackendError::new(GraphSource::GeneLab, format!("request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::new(
                GraphSource::GeneLab,
                format!("endpoint returned HTTP {status}"),
            ));
        }
        let payload: Value = response.json().await.map_err(|e| {
            BackendError::new(GraphSource::GeneLab, format!("malformed response body: {e}"))
        })?;
        Ok(parse_binding_rows(&payload))
    }
}

/// Flatten `results.bindings` terms into rows of variable name to value.
fn parse_binding_rows(payload: &Value) -> Vec<Row> {
    let empty = Vec::new();
    let bindings = payload
        .pointer("/results/bindings")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    bindings
        .iter()
        .filter_map(Value::as_object)
        .map(|binding| {
            binding
                .iter()
                .map(|(var, term)| {
                    let value = term.get("value").cloned().unwrap_or(Value::Null);
                    (var.clone(), value)
                })
                .collect()
        })
        .collect()
}
