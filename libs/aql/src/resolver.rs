//! Data source resolver trait
//!
//! The executor does not know where documents live. A resolver turns a FROM class name
//! (`EHR`, `COMPOSITION`, ...) into the trees of every document of that class, grouped by
//! an index key such as the EHR id. [`DocumentIndex`](crate::index::DocumentIndex) is the
//! in-memory implementation.
//!
//! ```rust,ignore
//! struct StoreResolver { /* index client */ }
//!
//! impl DataSourceResolver for StoreResolver {
//!     fn resolve(&self, class_name: &str) -> Result<Container, ResolveError> {
//!         let mut container = Container::new();
//!         for (ehr_id, doc) in self.lookup(class_name)? {
//!             container.push(ehr_id, doc.to_node());
//!         }
//!         Ok(container)
//!     }
//! }
//! ```

use crate::tree::Node;
use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;

/// Resolver failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("unknown data source class '{0}'")]
    NotFound(String),

    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

/// Trait for data source resolution
pub trait DataSourceResolver: Send + Sync {
    /// Trees of every document of `class_name`.
    ///
    /// An empty container is a valid answer; `NotFound` is for classes the resolver does not
    /// serve at all.
    fn resolve(&self, class_name: &str) -> Result<Container, ResolveError>;
}

impl<R: DataSourceResolver + ?Sized> DataSourceResolver for Arc<R> {
    fn resolve(&self, class_name: &str) -> Result<Container, ResolveError> {
        (**self).resolve(class_name)
    }
}

/// Top-level document trees of one data source, grouped by index key in insertion order
#[derive(Debug, Clone, Default)]
pub struct Container {
    groups: IndexMap<String, Vec<Arc<Node>>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, node: Node) {
        self.groups
            .entry(key.into())
            .or_default()
            .push(Arc::new(node));
    }

    /// All top-level nodes, group by group.
    pub fn nodes(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.groups.values().flatten()
    }

    pub fn groups(&self) -> &IndexMap<String, Vec<Arc<Node>>> {
        &self.groups
    }

    /// Number of top-level nodes
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ValueNode;

    #[test]
    fn nodes_follow_group_insertion_order() {
        let mut container = Container::new();
        container.push("b", ValueNode::new(1i64).into());
        container.push("a", ValueNode::new(2i64).into());
        container.push("b", ValueNode::new(3i64).into());

        let values: Vec<_> = container
            .nodes()
            .filter_map(|node| node.as_value().and_then(|v| v.as_integer()))
            .collect();
        assert_eq!(values, vec![1, 3, 2]);
        assert_eq!(container.len(), 3);
        assert_eq!(container.groups().len(), 2);
    }
}
