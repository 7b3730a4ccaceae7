//! AQL query engine over openEHR documents
//!
//! Typed documents from `ipehr-models` are turned into a generic tree, paths are walked over
//! that tree, and a parsed query projects the matches into a result table.
//!
//! # Architecture Overview
//!
//! ```text
//! Parsed query (AST)
//!      |
//! FROM -> DataSourceResolver -> Container of trees (ToNode)
//!      |
//! SELECT -> path evaluation per expression
//!      |
//! ResultTable (columns + rows)
//! ```
//!
//! # Example
//!
//! ```
//! use ipehr_aql::ast::{
//!     FromClause, IdentifiedPath, ObjectPath, Query, SelectClause, SelectExpr, SelectValue,
//! };
//! use ipehr_aql::{Context, DocumentIndex, Executor, Value};
//! use ipehr_models::Ehr;
//!
//! let mut index = DocumentIndex::new();
//! index.add_ehr(Ehr::new("gateway", "abc-123", "2024-01-01T00:00:00Z"));
//!
//! let query = Query {
//!     select: SelectClause {
//!         distinct: false,
//!         exprs: vec![SelectExpr {
//!             value: SelectValue::IdentifiedPath(IdentifiedPath::new(
//!                 "e",
//!                 Some(ObjectPath::from_identifiers(["ehr_id", "value"])),
//!             )),
//!             alias: Some("ID".into()),
//!         }],
//!     },
//!     from: FromClause::class("EHR", Some("e")),
//!     where_clause: None,
//!     order_by: Vec::new(),
//! };
//!
//! let table = Executor::new(index).execute(&query, &Context::new()).unwrap();
//! assert_eq!(table.column_names(), vec!["ID"]);
//! assert_eq!(table.rows[0].values, vec![Value::string("abc-123")]);
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod executor;
pub mod index;
pub mod path;
pub mod resolver;
pub mod result;
pub mod tree;
pub mod value;

// Re-export main types
pub use context::{CancellationToken, Context};
pub use error::{Error, Result};
pub use executor::{DataSource, DataSources, ExecuteOptions, Executor};
pub use index::DocumentIndex;
pub use resolver::{Container, DataSourceResolver, ResolveError};
pub use result::{Column, ResultSet, ResultTable, Row};
pub use tree::{Node, NodeKind, ToNode};
pub use value::Value;
