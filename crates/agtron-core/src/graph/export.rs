//! Petgraph view of a [`System`] for ordering and rendering.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A depends on B", exactly as in the constraint list.
//! The edge weight is the [`ConstraintType`].
//!
//! ## Nodes
//!
//! Components come first, in insertion order (duplicate names collapse onto
//! the first). Constraint endpoints that name no component are added after
//! them as external nodes.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::dot::Dot;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{instrument, warn};

use super::System;
use crate::model::ConstraintType;

/// A directed dependency graph built from a [`System`].
#[derive(Debug)]
pub struct DependencyGraph {
    /// Directed graph: nodes = identifiers, edges = constraints.
    pub graph: DiGraph<String, ConstraintType>,
    /// Mapping from identifier to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Build the graph from a system's components and constraints.
    ///
    /// Duplicate `origin → dependent` pairs collapse onto the first constraint.
    #[instrument(skip_all)]
    pub fn from_system(system: &System) -> Self {
        let mut graph = DiGraph::<String, ConstraintType>::new();
        let mut node_map: HashMap<String, NodeIndex> =
            HashMap::with_capacity(system.components().len());

        for component in system.components() {
            node_map
                .entry(component.name().to_string())
                .or_insert_with(|| graph.add_node(component.name().to_string()));
        }

        for constraint in system.constraints() {
            let origin = constraint.origin().to_string();
            let dependent = constraint.dependent().to_string();

            let origin_idx = *node_map
                .entry(origin.clone())
                .or_insert_with(|| graph.add_node(origin));
            let dependent_idx = *node_map
                .entry(dependent.clone())
                .or_insert_with(|| graph.add_node(dependent));

            // Avoid duplicate edges (petgraph allows them by default).
            if !graph.contains_edge(origin_idx, dependent_idx) {
                graph.add_edge(origin_idx, dependent_idx, constraint.kind());
            }
        }

        Self { graph, node_map }
    }

    /// Return the number of nodes (identifiers) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of distinct edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for an identifier.
    #[must_use]
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    /// Return the identifier label for a node.
    #[must_use]
    pub fn name(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Identifiers nothing depends on (no incoming edges), in node order.
    #[must_use]
    pub fn entry_points(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .filter_map(|idx| self.name(idx))
            .collect()
    }

    /// Dependencies before their dependents, i.e. a valid start-up order.
    ///
    /// Returns `None` if the graph has a cycle, which a validated [`System`]
    /// never does.
    #[must_use]
    pub fn deployment_order(&self) -> Option<Vec<&str>> {
        match toposort(&self.graph, None) {
            Ok(order) => Some(order.into_iter().rev().filter_map(|idx| self.name(idx)).collect()),
            Err(cycle) => {
                warn!(node = ?self.name(cycle.node_id()), "deployment order requested for cyclic graph");
                None
            }
        }
    }

    /// Render as Graphviz DOT, with edges labeled `hard` or `soft`.
    #[must_use]
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::new(&self.graph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Component, Constraint};

    fn sample() -> System {
        System::new(
            vec![
                Component::unknown("web"),
                Component::unknown("api"),
                Component::unknown("db"),
            ],
            vec![
                Constraint::hard("web", "api").expect("valid"),
                Constraint::soft("api", "db").expect("valid"),
                Constraint::hard("api", "cache").expect("valid"),
                Constraint::hard("web", "api").expect("valid"),
            ],
        )
        .expect("valid system")
    }

    #[test]
    fn components_then_external_nodes() {
        let graph = DependencyGraph::from_system(&sample());
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.node_index("web"), Some(NodeIndex::new(0)));
        assert_eq!(graph.node_index("cache"), Some(NodeIndex::new(3)));
        assert!(graph.node_index("missing").is_none());
    }

    #[test]
    fn deployment_order_puts_dependencies_first() {
        let graph = DependencyGraph::from_system(&sample());
        let order = graph.deployment_order().expect("acyclic");
        let pos = |name: &str| order.iter().position(|n| *n == name).expect("present");

        assert!(pos("db") < pos("api"));
        assert!(pos("cache") < pos("api"));
        assert!(pos("api") < pos("web"));
    }

    #[test]
    fn entry_points_have_no_dependents() {
        let graph = DependencyGraph::from_system(&sample());
        assert_eq!(graph.entry_points(), ["web"]);
    }

    #[test]
    fn dot_output_labels_edges() {
        let dot = DependencyGraph::from_system(&sample()).to_dot();
        assert!(dot.starts_with("digraph"), "dot: {dot}");
        assert!(dot.contains("label = \"web\""), "dot: {dot}");
        assert!(dot.contains("label = \"soft\""), "dot: {dot}");
    }
}
