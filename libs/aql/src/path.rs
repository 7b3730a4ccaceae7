//! Path evaluation over the generic tree
//!
//! A path is walked with an explicit worklist of `(node, remaining segments)` pairs, so
//! the depth of a document never translates into recursion depth. Each node kind decides
//! how the current segment is applied:
//!
//! - **Object**: the child named by the segment. A slice child keeps the segment current
//!   so that the slice can apply the segment's predicate. An object child must carry the
//!   predicate's archetype code when there is one.
//! - **Slice**: only navigable through an archetype code predicate.
//! - **Data value**: the named sub-value.
//! - **Value**: the result; any remaining segments are ignored.
//!
//! Reaching a non-value node with nothing left to walk is "no match", as is running out of
//! work. Neither is an error.

use crate::ast::{ObjectPath, PathSegment};
use crate::tree::{Node, NodeKind};
use crate::value::Value;
use std::collections::VecDeque;
use std::sync::Arc;

/// Evaluate `path` starting at `start`; at most one value is produced.
pub fn evaluate(path: &ObjectPath, start: &Arc<Node>) -> Option<Value> {
    let mut work: VecDeque<(Arc<Node>, &[PathSegment])> = VecDeque::new();
    work.push_back((Arc::clone(start), path.segments.as_slice()));

    while let Some((node, remaining)) = work.pop_front() {
        if let Some(value) = node.as_value() {
            return Some(value.clone());
        }

        let Some((segment, rest)) = remaining.split_first() else {
            continue;
        };

        match node.as_ref() {
            Node::Object(object) => {
                let Some(child) = object.child(&segment.identifier) else {
                    continue;
                };
                let next = match child.kind() {
                    NodeKind::Slice => remaining,
                    kind if kind.is_object() => match segment.archetype_code() {
                        Some(code) if child.id() != Some(code) => continue,
                        _ => rest,
                    },
                    _ => rest,
                };
                work.push_back((child, next));
            }
            Node::Slice(slice) => {
                if let Some(child) = segment.archetype_code().and_then(|code| slice.child(code)) {
                    work.push_back((child, rest));
                }
            }
            Node::DataValue(data_value) => {
                if let Some(child) = data_value.child(&segment.identifier) {
                    work.push_back((child, rest));
                }
            }
            Node::Value(_) => {}
        }
    }

    None
}

/// Evaluate `path` against every node of a collection, keeping matches in collection order.
pub fn evaluate_all<'a, I>(path: &ObjectPath, nodes: I) -> Vec<Value>
where
    I: IntoIterator<Item = &'a Arc<Node>>,
{
    nodes
        .into_iter()
        .filter_map(|node| {
            let value = evaluate(path, node);
            if let Some(value) = &value {
                tracing::trace!(path = %path, %value, "path matched");
            }
            value
        })
        .collect()
}
