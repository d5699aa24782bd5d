//! Per-call adjacency view over a constraint slice.
//!
//! Every traversal builds its own [`EdgeIndex`] and visited sets, so a shared
//! `&System` can be queried from several threads at once.

use std::collections::HashMap;

use crate::model::Constraint;

/// Borrowed adjacency list: origin → dependents, in constraint insertion order.
///
/// Duplicate constraints produce duplicate entries, matching the order in which
/// a walk over the raw constraint list would visit them.
#[derive(Debug, Default)]
pub(crate) struct EdgeIndex<'a> {
    forward: HashMap<&'a str, Vec<&'a str>>,
    /// Every identifier that appears as an endpoint, in first-seen order.
    nodes: Vec<&'a str>,
}

impl<'a> EdgeIndex<'a> {
    pub(crate) fn new(constraints: &'a [Constraint]) -> Self {
        let mut forward: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        let mut nodes = Vec::new();

        for constraint in constraints {
            let origin = constraint.origin();
            let dependent = constraint.dependent();

            for endpoint in [origin, dependent] {
                if !forward.contains_key(endpoint) {
                    forward.insert(endpoint, Vec::new());
                    nodes.push(endpoint);
                }
            }

            forward.entry(origin).or_default().push(dependent);
        }

        Self { forward, nodes }
    }

    /// Direct dependencies of `node`; empty for unknown identifiers.
    pub(crate) fn dependencies_of(&self, node: &str) -> &[&'a str] {
        self.forward.get(node).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn nodes(&self) -> &[&'a str] {
        &self.nodes
    }
}
