//! Availability consistency and range recommendation.
//!
//! A service cannot be more available than anything it relies on. If `a`
//! depends on `b`, directly or through any chain of constraints, and both have
//! numeric availabilities, then `b` must be at least as available as `a`.
//!
//! `Unknown` availabilities are skipped on either side, and so are identifiers
//! that do not resolve to a component. The check is transitive, so
//! `a(99) → b(unknown) → c(95)` is still caught as `a` against `c`.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::trace;

use super::index::EdgeIndex;
use crate::error::SystemError;
use crate::model::{Component, Constraint};

/// Lower bound of a recommendation when nothing depends on the identifier.
pub const MIN_AVAILABILITY: f64 = 0.0;
/// Upper bound of a recommendation when the identifier depends on nothing known.
pub const MAX_AVAILABILITY: f64 = 100.0;

// ---------------------------------------------------------------------------
// AvailabilityRange
// ---------------------------------------------------------------------------

/// Admissible availability for an identifier given its direct neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AvailabilityRange {
    pub min: f64,
    pub max: f64,
}

impl Default for AvailabilityRange {
    fn default() -> Self {
        Self {
            min: MIN_AVAILABILITY,
            max: MAX_AVAILABILITY,
        }
    }
}

impl AvailabilityRange {
    /// `false` when the neighbors' availabilities cannot all be honored
    /// (`min > max`).
    #[must_use]
    pub fn is_satisfiable(&self) -> bool {
        self.min <= self.max
    }

    /// Returns `true` if `value` lies within `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

// ---------------------------------------------------------------------------
// Name resolution
// ---------------------------------------------------------------------------

/// Name → first component with that name, in insertion order.
fn first_by_name(components: &[Component]) -> HashMap<&str, &Component> {
    let mut by_name = HashMap::with_capacity(components.len());
    for component in components {
        by_name.entry(component.name()).or_insert(component);
    }
    by_name
}

fn known_availability(by_name: &HashMap<&str, &Component>, name: &str) -> Option<f64> {
    by_name
        .get(name)
        .and_then(|component| component.availability().value())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check every component with a numeric availability against all of its
/// transitive dependencies.
///
/// Components are checked in insertion order and dependencies in discovery
/// order; the first violation is returned.
pub(crate) fn check_availability(
    components: &[Component],
    index: &EdgeIndex<'_>,
) -> Result<(), SystemError> {
    let by_name = first_by_name(components);

    for component in components {
        let Some(availability) = component.availability().value() else {
            continue;
        };

        for dependency in transitive_dependencies(index, component.name()) {
            let Some(resolved) = by_name.get(dependency) else {
                trace!(component = component.name(), dependency, "external dependency skipped");
                continue;
            };
            let Some(dependency_availability) = resolved.availability().value() else {
                continue;
            };

            if dependency_availability < availability {
                return Err(SystemError::AvailabilityConstraintViolation {
                    component: component.name().to_string(),
                    availability,
                    dependency: resolved.name().to_string(),
                    dependency_availability,
                });
            }
        }
    }

    Ok(())
}

/// Every identifier reachable from `name`, deduplicated, in discovery order.
///
/// Walks depth-first with an explicit frame stack; `name` itself only appears
/// in the result if some path leads back to it.
pub(crate) fn transitive_dependencies<'a>(index: &EdgeIndex<'a>, name: &'a str) -> Vec<&'a str> {
    let mut visited = HashSet::from([name]);
    let mut seen = HashSet::new();
    let mut dependencies = Vec::new();
    let mut call_stack = vec![(name, 0_usize)];

    while let Some(frame) = call_stack.last_mut() {
        let Some(&dependency) = index.dependencies_of(frame.0).get(frame.1) else {
            call_stack.pop();
            continue;
        };
        frame.1 += 1;

        if seen.insert(dependency) {
            dependencies.push(dependency);
        }
        if visited.insert(dependency) {
            call_stack.push((dependency, 0));
        }
    }

    dependencies
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// Recommend an availability range for `name` from its one-hop neighbors.
///
/// `max` becomes the lowest known availability among the identifier's direct
/// dependencies and `min` the highest among its direct dependents. Unknown and
/// unresolved neighbors are ignored. An unsatisfiable range (`min > max`) is
/// returned as-is.
pub(crate) fn recommend_range(
    components: &[Component],
    constraints: &[Constraint],
    name: &str,
) -> AvailabilityRange {
    let by_name = first_by_name(components);

    let mut lowest_dependency: Option<f64> = None;
    let mut highest_dependent: Option<f64> = None;

    for constraint in constraints {
        if constraint.origin() == name {
            if let Some(value) = known_availability(&by_name, constraint.dependent()) {
                lowest_dependency = Some(lowest_dependency.map_or(value, |low| low.min(value)));
            }
        }
        if constraint.dependent() == name {
            if let Some(value) = known_availability(&by_name, constraint.origin()) {
                highest_dependent = Some(highest_dependent.map_or(value, |high| high.max(value)));
            }
        }
    }

    AvailabilityRange {
        min: highest_dependent.unwrap_or(MIN_AVAILABILITY),
        max: lowest_dependency.unwrap_or(MAX_AVAILABILITY),
    }
}
