//! Reachability and simple-path enumeration.
//!
//! # Edge Direction
//!
//! Traversals follow `origin → dependent` edges: starting from a component,
//! they walk towards everything it (transitively) depends on.
//!
//! # Path Shape
//!
//! [`ConstraintPath`] mirrors the cardinality of the result: no path, exactly
//! one bare path, or a list of paths. Callers must handle all three.

use std::collections::HashSet;

use serde::{Serialize, Serializer};

use super::index::EdgeIndex;

/// Longest path (in nodes) that enumeration will report.
///
/// Longer paths are pruned, which bounds the otherwise exponential search on
/// densely connected graphs.
pub const MAX_PATH_LEN: usize = 10;

// ---------------------------------------------------------------------------
// ConstraintPath
// ---------------------------------------------------------------------------

/// The result of [`System::constraint_path`](super::System::constraint_path).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConstraintPath {
    /// No path, or origin and dependent are the same identifier.
    #[default]
    Empty,
    /// Exactly one path, from origin to dependent inclusive.
    Single(Vec<String>),
    /// Two or more paths, in depth-first discovery order.
    Multiple(Vec<Vec<String>>),
}

impl ConstraintPath {
    fn from_paths(mut paths: Vec<Vec<String>>) -> Self {
        match paths.len() {
            0 => Self::Empty,
            1 => paths.pop().map_or(Self::Empty, Self::Single),
            _ => Self::Multiple(paths),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Number of distinct paths found.
    #[must_use]
    pub fn path_count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Single(_) => 1,
            Self::Multiple(paths) => paths.len(),
        }
    }

    /// All paths as a uniform list, regardless of cardinality.
    #[must_use]
    pub fn paths(&self) -> Vec<&[String]> {
        match self {
            Self::Empty => Vec::new(),
            Self::Single(path) => vec![path.as_slice()],
            Self::Multiple(paths) => paths.iter().map(Vec::as_slice).collect(),
        }
    }
}

/// Serializes as `[]`, a bare `["a", "b"]` path, or `[["a", "b"], ["a", "c", "b"]]`.
impl Serialize for ConstraintPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.collect_seq(std::iter::empty::<&str>()),
            Self::Single(path) => path.serialize(serializer),
            Self::Multiple(paths) => paths.serialize(serializer),
        }
    }
}

// ---------------------------------------------------------------------------
// Reachability
// ---------------------------------------------------------------------------

/// Returns `true` if `target` can be reached from `origin` over one or more edges.
///
/// Iterative DFS with an explicit `(node, next neighbor position)` stack.
pub(crate) fn is_reachable(index: &EdgeIndex<'_>, origin: &str, target: &str) -> bool {
    let mut visited = HashSet::from([origin]);
    let mut call_stack = vec![(origin, 0_usize)];

    while let Some(frame) = call_stack.last_mut() {
        let Some(&next) = index.dependencies_of(frame.0).get(frame.1) else {
            call_stack.pop();
            continue;
        };
        frame.1 += 1;

        if next == target {
            return true;
        }
        if visited.insert(next) {
            call_stack.push((next, 0));
        }
    }

    false
}

// ---------------------------------------------------------------------------
// Path enumeration
// ---------------------------------------------------------------------------

/// Enumerate every simple path from `origin` to `target` of at most
/// [`MAX_PATH_LEN`] nodes.
///
/// At each branch, edges are followed in constraint insertion order.
pub(crate) fn constraint_path(index: &EdgeIndex<'_>, origin: &str, target: &str) -> ConstraintPath {
    if origin == target {
        return ConstraintPath::Empty;
    }

    let mut visited = HashSet::new();
    let mut current_path = vec![origin];
    let mut found = Vec::new();

    walk_paths(
        index,
        origin,
        target,
        &mut visited,
        &mut current_path,
        &mut found,
    );

    ConstraintPath::from_paths(found)
}

fn walk_paths<'a>(
    index: &EdgeIndex<'a>,
    current: &'a str,
    target: &str,
    visited: &mut HashSet<&'a str>,
    current_path: &mut Vec<&'a str>,
    found: &mut Vec<Vec<String>>,
) {
    if visited.contains(current) || current_path.len() > MAX_PATH_LEN {
        return;
    }

    if current == target && current_path.len() > 1 {
        found.push(current_path.iter().map(|node| (*node).to_string()).collect());
        return;
    }

    visited.insert(current);

    for &next in index.dependencies_of(current) {
        current_path.push(next);
        walk_paths(index, next, target, visited, current_path, found);
        current_path.pop();
    }

    visited.remove(current);
}
