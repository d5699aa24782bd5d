//! Cycle detection for the constraint graph.
//!
//! # Design
//!
//! - **Three-color DFS**: a node is White until first visited, Gray while it is
//!   on the DFS stack, and Black once its subtree is exhausted. An edge into a
//!   Gray node is a back edge and closes a cycle.
//! - **Whole graph**: the search starts from every endpoint that is still
//!   White, so disconnected subgraphs are covered. Components without edges
//!   cannot take part in a cycle and are not visited.
//! - **O(V+E)**: each node and edge is visited at most once.
//!
//! The search runs after every structural mutation of a
//! [`System`](super::System), so large graphs with frequent edits pay the full
//! cost each time.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use super::index::EdgeIndex;

/// DFS colors for cycle detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Not yet visited.
    White,
    /// Currently on the DFS stack (in progress).
    Gray,
    /// Fully processed (all descendants visited).
    Black,
}

/// Find one cycle in the graph, if any.
///
/// The cycle is returned as an ordered list of identifiers that starts and
/// ends with the same node, e.g. `["a", "b", "c", "a"]` for `a → b → c → a`.
pub(crate) fn find_cycle(index: &EdgeIndex<'_>) -> Option<Vec<String>> {
    let mut color: HashMap<&str, Color> = HashMap::with_capacity(index.nodes().len());

    for &node in index.nodes() {
        if color_of(&color, node) == Color::White {
            if let Some(cycle) = dfs_find_cycle(index, node, &mut color) {
                return Some(cycle);
            }
        }
    }

    None
}

fn color_of(color: &HashMap<&str, Color>, node: &str) -> Color {
    color.get(node).copied().unwrap_or(Color::White)
}

/// DFS that stops at the first back edge and reconstructs the loop it closes.
///
/// Iterative with an explicit frame stack, so long dependency chains cannot
/// overflow the call stack. Each frame is `(node, next neighbor position)`;
/// the frames from bottom to top are the current DFS path.
fn dfs_find_cycle<'a>(
    index: &EdgeIndex<'a>,
    start: &'a str,
    color: &mut HashMap<&'a str, Color>,
) -> Option<Vec<String>> {
    color.insert(start, Color::Gray);
    let mut call_stack: Vec<(&'a str, usize)> = vec![(start, 0)];

    while let Some(frame) = call_stack.last_mut() {
        let node = frame.0;
        let Some(&neighbor) = index.dependencies_of(node).get(frame.1) else {
            color.insert(node, Color::Black);
            call_stack.pop();
            continue;
        };
        frame.1 += 1;

        match color_of(color, neighbor) {
            Color::White => {
                color.insert(neighbor, Color::Gray);
                call_stack.push((neighbor, 0));
            }
            Color::Gray => {
                // Back edge node → neighbor: neighbor is an ancestor on the stack.
                let from = call_stack
                    .iter()
                    .position(|&(ancestor, _)| ancestor == neighbor)
                    .unwrap_or(0);
                let mut chain: Vec<String> = call_stack[from..]
                    .iter()
                    .map(|&(ancestor, _)| ancestor.to_string())
                    .collect();
                chain.push(neighbor.to_string());
                return Some(chain);
            }
            Color::Black => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Constraint;

    fn edges(pairs: &[(&str, &str)]) -> Vec<Constraint> {
        pairs
            .iter()
            .map(|(from, to)| Constraint::hard(*from, *to).expect("valid edge"))
            .collect()
    }

    fn cycle_in(pairs: &[(&str, &str)]) -> Option<Vec<String>> {
        let constraints = edges(pairs);
        find_cycle(&EdgeIndex::new(&constraints))
    }

    #[test]
    fn empty_graph_has_no_cycle() {
        assert!(cycle_in(&[]).is_none());
    }

    #[test]
    fn chain_and_diamond_are_acyclic() {
        assert!(cycle_in(&[("a", "b"), ("b", "c")]).is_none());
        assert!(cycle_in(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]).is_none());
    }

    #[test]
    fn mutual_dependency_detected() {
        let cycle = cycle_in(&[("a", "b"), ("b", "a")]).expect("cycle");
        assert_eq!(cycle, ["a", "b", "a"]);
    }

    #[test]
    fn three_node_cycle_path() {
        let cycle = cycle_in(&[("a", "b"), ("b", "c"), ("c", "a")]).expect("cycle");
        assert_eq!(cycle, ["a", "b", "c", "a"]);
    }

    #[test]
    fn cycle_in_disconnected_subgraph_detected() {
        let cycle = cycle_in(&[("x", "y"), ("y", "z"), ("p", "q"), ("q", "r"), ("r", "q")])
            .expect("cycle");
        assert_eq!(cycle.first(), cycle.last());
        assert!(cycle.contains(&"q".to_string()));
        assert!(cycle.contains(&"r".to_string()));
        assert!(!cycle.contains(&"p".to_string()));
    }

    #[test]
    fn large_chain_no_cycle_then_closed() {
        let names: Vec<String> = (0..1000).map(|i| format!("n{i}")).collect();
        let mut pairs: Vec<(&str, &str)> = names
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
            .collect();
        assert!(cycle_in(&pairs).is_none());

        pairs.push((names[999].as_str(), names[0].as_str()));
        let cycle = cycle_in(&pairs).expect("cycle");
        assert_eq!(cycle.len(), 1001);
    }

    #[test]
    fn deep_chain_does_not_exhaust_stack() {
        let names: Vec<String> = (0..=200_000).map(|i| format!("n{i}")).collect();
        let mut pairs: Vec<(&str, &str)> = names
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
            .collect();
        assert!(cycle_in(&pairs).is_none());

        pairs.push((names[200_000].as_str(), names[199_998].as_str()));
        let cycle = cycle_in(&pairs).expect("cycle");
        assert_eq!(cycle, ["n199998", "n199999", "n200000", "n199998"]);
    }

    #[test]
    fn back_edge_cycle_excludes_path_prefix() {
        let cycle = cycle_in(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "b")]).expect("cycle");
        assert_eq!(cycle, ["b", "c", "d", "b"]);
    }
}
