//! Query requests read from disk
//!
//! A request file is either a bare query syntax tree or an envelope in the gateway's
//! request shape:
//!
//! ```json
//! {
//!   "q": "SELECT e/ehr_id/value AS ID FROM EHR e",
//!   "query": { "select": { ... }, "from": { ... } },
//!   "offset": 0,
//!   "fetch": 10,
//!   "query_parameters": { "site": "Berlin" }
//! }
//! ```

use anyhow::Context as _;
use indexmap::IndexMap;
use ipehr_aql::ast::Query;
use ipehr_aql::{Context, Value};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// Query text, echoed in the result envelope
    #[serde(default)]
    pub q: String,

    pub query: Query,

    #[serde(default)]
    pub offset: Option<usize>,

    #[serde(default)]
    pub fetch: Option<usize>,

    #[serde(default)]
    pub query_parameters: IndexMap<String, Value>,
}

impl QueryRequest {
    pub fn from_json(json: serde_json::Value) -> anyhow::Result<Self> {
        if json.get("query").is_some() {
            return serde_json::from_value(json).context("Invalid query request");
        }
        let query: Query = serde_json::from_value(json).context("Invalid query syntax tree")?;
        Ok(Self {
            q: String::new(),
            query,
            offset: None,
            fetch: None,
            query_parameters: IndexMap::new(),
        })
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read query {}", path.display()))?;
        let json = serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        Self::from_json(json).with_context(|| format!("Failed to load query {}", path.display()))
    }

    /// Execution context carrying the request parameters and an optional deadline.
    pub fn context(&self, timeout: Option<Duration>) -> Context {
        let mut ctx = Context::new();
        for (name, value) in &self.query_parameters {
            ctx.set_parameter(name.as_str(), value.clone());
        }
        match timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bare_query() -> serde_json::Value {
        json!({
            "select": { "exprs": [ { "value": { "type": "primitive",
                                                "value": { "type": "integer", "value": 1 } } } ] },
            "from": {}
        })
    }

    #[test]
    fn bare_query_is_accepted() {
        let request = QueryRequest::from_json(bare_query()).unwrap();
        assert!(request.q.is_empty());
        assert_eq!(request.query.select.exprs.len(), 1);
    }

    #[test]
    fn envelope_carries_parameters() {
        let request = QueryRequest::from_json(json!({
            "q": "SELECT 1",
            "query": bare_query(),
            "fetch": 5,
            "query_parameters": { "site": "Berlin" }
        }))
        .unwrap();

        assert_eq!(request.fetch, Some(5));
        let ctx = request.context(None);
        assert_eq!(ctx.get_parameter("$site"), Some(&Value::string("Berlin")));
    }
}
