//! The system aggregate: components, constraints, and the graph engine over them.
//!
//! # Invariants
//!
//! A [`System`] returned by [`System::new`] is acyclic and availability
//! consistent. After that it only grows:
//!
//! - [`System::add_component`] appends without re-validation.
//! - [`System::add_constraint`] appends, then re-validates the whole graph.
//!   A failed add is **not** rolled back: the edge stays in the collection and
//!   the caller must discard the system if it cannot tolerate that.
//!
//! # Usage
//!
//! ```rust
//! use agtron_core::graph::{ConstraintPath, System};
//! use agtron_core::model::{Component, Constraint};
//!
//! let system = System::new(
//!     vec![Component::unknown("web"), Component::unknown("db")],
//!     vec![Constraint::hard("web", "db")?],
//! )?;
//!
//! assert!(system.indirect_constraint_exists("web", "db"));
//! assert_eq!(
//!     system.constraint_path("web", "db"),
//!     ConstraintPath::Single(vec!["web".into(), "db".into()])
//! );
//! # Ok::<(), agtron_core::SystemError>(())
//! ```

use serde::Serialize;
use tracing::{debug, instrument};

use super::availability::{self, AvailabilityRange};
use super::cycles;
use super::index::EdgeIndex;
use super::paths::{self, ConstraintPath};
use crate::error::SystemError;
use crate::model::{Component, Constraint};

/// A validated dependency graph of components.
#[derive(Debug, Clone, Default, Serialize)]
pub struct System {
    components: Vec<Component>,
    constraints: Vec<Constraint>,
}

impl System {
    /// Build a system and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::CyclicDependency`] if the constraints contain a
    /// cycle, or [`SystemError::AvailabilityConstraintViolation`] if any
    /// component depends on something less available than itself.
    #[instrument(skip_all, fields(components = components.len(), constraints = constraints.len()))]
    pub fn new(
        components: Vec<Component>,
        constraints: Vec<Constraint>,
    ) -> Result<Self, SystemError> {
        let system = Self {
            components,
            constraints,
        };
        system.validate()?;
        debug!("system validated");
        Ok(system)
    }

    /// An empty system. Trivially valid.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Guarded mutators
    // -----------------------------------------------------------------------

    /// Append a component. No validation is triggered.
    pub fn add_component(&mut self, component: Component) {
        debug!(name = component.name(), availability = %component.availability(), "component added");
        self.components.push(component);
    }

    /// Append a constraint and re-validate the whole graph.
    ///
    /// # Errors
    ///
    /// Same as [`System::new`]. On error the constraint has already been
    /// appended and is not removed.
    #[instrument(skip_all, fields(constraint = %constraint))]
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), SystemError> {
        self.constraints.push(constraint);
        self.validate()
    }

    /// Append a constraint without any validation.
    ///
    /// Builds configurations that the validated mutators cannot reach.
    #[cfg(any(test, feature = "test-support"))]
    pub fn push_constraint_unchecked(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    // -----------------------------------------------------------------------
    // Collections and direct lookups
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The first component named `name`, in insertion order.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|component| component.name() == name)
    }

    #[must_use]
    pub fn component_exists(&self, name: &str) -> bool {
        self.component(name).is_some()
    }

    /// Returns `true` if some constraint is exactly `origin → dependent`, of any type.
    #[must_use]
    pub fn direct_constraint_exists(&self, origin: &str, dependent: &str) -> bool {
        self.constraints
            .iter()
            .any(|constraint| constraint.connects(origin, dependent))
    }

    /// The first constraint `origin → dependent`, if any.
    #[must_use]
    pub fn direct_constraint(&self, origin: &str, dependent: &str) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|constraint| constraint.connects(origin, dependent))
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Returns `true` if the constraint graph contains no cycle.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        self.find_cycle().is_none()
    }

    /// One cycle in the constraint graph, as a closed list of identifiers.
    #[must_use]
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        cycles::find_cycle(&EdgeIndex::new(&self.constraints))
    }

    /// Check acyclicity, then availability consistency.
    ///
    /// # Errors
    ///
    /// The first invariant violation found.
    pub fn validate(&self) -> Result<(), SystemError> {
        validate(&self.components, &self.constraints)
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Returns `true` if `origin` depends on `dependent` through one or more edges.
    ///
    /// Always `false` when both are the same identifier.
    #[must_use]
    pub fn indirect_constraint_exists(&self, origin: &str, dependent: &str) -> bool {
        if origin == dependent {
            return false;
        }
        if self.direct_constraint_exists(origin, dependent) {
            return true;
        }
        paths::is_reachable(&EdgeIndex::new(&self.constraints), origin, dependent)
    }

    /// Every simple path from `origin` to `dependent` of at most
    /// [`MAX_PATH_LEN`](super::MAX_PATH_LEN) nodes.
    #[must_use]
    pub fn constraint_path(&self, origin: &str, dependent: &str) -> ConstraintPath {
        paths::constraint_path(&EdgeIndex::new(&self.constraints), origin, dependent)
    }

    /// Every identifier `name` transitively depends on, in discovery order.
    #[must_use]
    pub fn transitive_dependencies(&self, name: &str) -> Vec<String> {
        let index = EdgeIndex::new(&self.constraints);
        availability::transitive_dependencies(&index, name)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Recommend an availability range for `name` from its direct neighbors.
    ///
    /// `name` need not be a component.
    #[must_use]
    pub fn recommend_availability_range(&self, name: &str) -> AvailabilityRange {
        availability::recommend_range(&self.components, &self.constraints, name)
    }
}

/// Check acyclicity, then availability consistency, over borrowed parts.
pub(crate) fn validate(
    components: &[Component],
    constraints: &[Constraint],
) -> Result<(), SystemError> {
    let index = EdgeIndex::new(constraints);

    if let Some(cycle) = cycles::find_cycle(&index) {
        debug!(cycle = %cycle.join(" -> "), "cycle detected");
        return Err(SystemError::CyclicDependency { cycle });
    }

    availability::check_availability(components, &index)
}
