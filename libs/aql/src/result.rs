//! Query results

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// One result row; serializes as a JSON array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,

    /// AQL text of the selected expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Ordered rows plus one column per SELECT expression
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl ResultTable {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Keep `fetch` rows starting at `offset`; no `fetch` keeps the rest.
    pub fn paginate(mut self, offset: usize, fetch: Option<usize>) -> Self {
        let rows = self.rows.into_iter().skip(offset);
        self.rows = match fetch {
            Some(fetch) => rows.take(fetch).collect(),
            None => rows.collect(),
        };
        self
    }

    /// Wrap the table in the response envelope for query text `q`.
    pub fn into_result_set(self, q: impl Into<String>) -> ResultSet {
        ResultSet {
            q: q.into(),
            columns: self.columns,
            rows: self.rows,
        }
    }
}

/// Response envelope of a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub q: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(n: i64) -> ResultTable {
        ResultTable {
            columns: vec![Column {
                name: "n".into(),
                path: None,
            }],
            rows: (0..n).map(|i| Row::new(vec![Value::Integer(i)])).collect(),
        }
    }

    #[test]
    fn paginate_skips_then_takes() {
        let page = table(5).paginate(1, Some(2));
        assert_eq!(
            page.rows,
            vec![Row::new(vec![1i64.into()]), Row::new(vec![2i64.into()])]
        );
        assert_eq!(table(5).paginate(4, None).rows.len(), 1);
        assert!(table(5).paginate(10, Some(3)).rows.is_empty());
    }

    #[test]
    fn result_set_serializes_rows_as_arrays() {
        let set = table(1).into_result_set("SELECT 0 AS n FROM EHR");
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "q": "SELECT 0 AS n FROM EHR",
                "columns": [{ "name": "n" }],
                "rows": [[0]]
            })
        );
    }
}
