//! Scripted test doubles for the backend traits.
//!
//! Each fake holds a list of rules pairing query-text fragments with the
//! rows to return; the first rule whose fragments all appear in the query
//! wins, and unmatched queries return no rows. Fakes record every call so
//! tests can assert on the exact query text and bound parameters.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::{GraphSource, PropertyGraph, Row, TripleStore};
use crate::error::BackendError;

/// Build a row from string field pairs.
pub fn row(pairs: &[(&str, &str)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect()
}

/// Build a row from a JSON object, for fields that are not strings.
///
/// # Panics
///
/// Panics when `value` is not a JSON object.
pub fn json_row(value: Value) -> Row {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        other => panic!("json_row needs an object, got {other}"),
    }
}

struct Rule {
    fragments: Vec<String>,
    rows: Vec<Row>,
}

impl Rule {
    fn matches(&self, query: &str) -> bool {
        self.fragments.iter().all(|f| query.contains(f.as_str()))
    }
}

#[derive(Default)]
struct Script {
    rules: Vec<Rule>,
    fail: Option<String>,
    delay: Option<Duration>,
}

impl Script {
    fn on(&mut self, fragments: &[&str], rows: Vec<Row>) {
        self.rules.push(Rule {
            fragments: fragments.iter().map(|f| f.to_string()).collect(),
            rows,
        });
    }

    async fn respond(&self, graph: GraphSource, query: &str) -> Result<Vec<Row>, BackendError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.fail {
            return Err(BackendError::new(graph, message.clone()));
        }
        Ok(self
            .rules
            .iter()
            .find(|r| r.matches(query))
            .map(|r| r.rows.clone())
            .unwrap_or_default())
    }
}

/// Scripted property-graph stub.
#[derive(Default)]
pub struct FakePrimeKg {
    script: Script,
    calls: Mutex<Vec<(String, Value)>>,
}

impl FakePrimeKg {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule: queries containing all `fragments` return `rows`.
    pub fn on(mut self, fragments: &[&str], rows: Vec<Row>) -> Self {
        self.script.on(fragments, rows);
        self
    }

    /// A stub whose every query fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            script: Script {
                fail: Some(message.to_string()),
                ..Script::default()
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A stub that sleeps `delay` before answering each query.
    pub fn slow(delay: Duration) -> Self {
        Self {
            script: Script {
                delay: Some(delay),
                ..Script::default()
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every `(query, params)` pair seen so far, in call order.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PropertyGraph for FakePrimeKg {
    async fn query(&self, query: &str, params: Value) -> Result<Vec<Row>, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), params));
        self.script.respond(GraphSource::PrimeKg, query).await
    }
}

/// Scripted triple-store stub.
#[derive(Default)]
pub struct FakeTripleStore {
    script: Script,
    calls: Mutex<Vec<String>>,
}

impl FakeTripleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, fragments: &[&str], rows: Vec<Row>) -> Self {
        self.script.on(fragments, rows);
        self
    }

    pub fn failing(message: &str) -> Self {
        Self {
            script: Script {
                fail: Some(message.to_string()),
                ..Script::default()
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            script: Script {
                delay: Some(delay),
                ..Script::default()
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every rendered query seen so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TripleStore for FakeTripleStore {
    async fn query(&self, query: &str) -> Result<Vec<Row>, BackendError> {
        self.calls.lock().unwrap().push(query.to_string());
        self.script.respond(GraphSource::GeneLab, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn first_matching_rule_wins_and_unmatched_is_empty() {
        let pk = FakePrimeKg::new()
            .on(&["disease", "$ids"], vec![row(&[("name", "asthma")])])
            .on(&["disease"], vec![row(&[("name", "other")])]);

        let rows = pk
            .query("MATCH (n:disease) WHERE n.node_id IN $ids", json!({}))
            .await
            .unwrap();
        assert_eq!(rows[0]["name"], json!("asthma"));

        let rows = pk.query("MATCH (n:drug)", json!({})).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(pk.calls().len(), 2);
    }

    #[tokio::test]
    async fn failing_stub_reports_its_graph() {
        let gl = FakeTripleStore::failing("boom");
        let err = gl.query("SELECT ?x WHERE {}").await.unwrap_err();
        assert_eq!(err.graph, GraphSource::GeneLab);
        assert!(err.message.contains("boom"));
    }

    #[test]
    fn json_row_accepts_mixed_field_types() {
        let r = json_row(json!({"name": "asthma", "gene_count": 7}));
        assert_eq!(r["gene_count"], json!(7));
    }
}
