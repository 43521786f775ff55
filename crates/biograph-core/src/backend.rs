//! Backend trait seams for the two graph engines.
//!
//! The core never talks to a driver directly. It submits a parameterized
//! query through one of these traits and gets back rows of typed fields;
//! connection pooling, retries at the driver level, and wire formats are
//! the implementor's concern.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::BackendError;

/// Which graph a query or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphSource {
    PrimeKg,
    GeneLab,
}

impl fmt::Display for GraphSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphSource::PrimeKg => f.write_str("primekg"),
            GraphSource::GeneLab => f.write_str("genelab"),
        }
    }
}

/// One result row: field name to value.
pub type Row = BTreeMap<String, Value>;

/// String field accessor; missing or non-string fields read as `None`.
pub fn row_str<'a>(row: &'a Row, field: &str) -> Option<&'a str> {
    row.get(field).and_then(Value::as_str)
}

/// Property-graph backend (PrimeKG). Queries are pattern-match text with
/// bound parameters.
#[async_trait]
pub trait PropertyGraph: Send + Sync {
    /// Submit a parameterized query; `params` is a JSON object of bindings.
    async fn query(&self, query: &str, params: Value) -> Result<Vec<Row>, BackendError>;
}

/// Triple-store backend (GeneLab and the geospatial/SDoH graph). The query
/// text arrives fully rendered: placeholders are substituted by
/// [`crate::queries::sparql::substitute`] before submission, never here.
#[async_trait]
pub trait TripleStore: Send + Sync {
    async fn query(&self, query: &str) -> Result<Vec<Row>, BackendError>;
}

/// Run one backend sub-query under the configured deadline.
///
/// Timeouts and backend failures stay scoped to the sub-query; callers
/// decide how a failed slot affects the surrounding call.
pub async fn with_timeout<T>(
    graph: GraphSource,
    limit: std::time::Duration,
    fut: impl std::future::Future<Output = Result<T, BackendError>>,
) -> Result<T, crate::error::IntegrationError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(crate::error::IntegrationError::Timeout {
            graph,
            waited_ms: limit.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn row_str_reads_only_strings() {
        let mut row = Row::new();
        row.insert("name".into(), json!("TP53"));
        row.insert("count".into(), json!(3));
        assert_eq!(row_str(&row, "name"), Some("TP53"));
        assert_eq!(row_str(&row, "count"), None);
        assert_eq!(row_str(&row, "missing"), None);
    }

    #[test]
    fn graph_source_display() {
        assert_eq!(GraphSource::PrimeKg.to_string(), "primekg");
        assert_eq!(GraphSource::GeneLab.to_string(), "genelab");
    }
}
