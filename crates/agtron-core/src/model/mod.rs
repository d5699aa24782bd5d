//! Domain model: components and the constraints between them.
//!
//! - [`component`]: named services with an [`Availability`].
//! - [`constraint`]: typed `origin → dependent` edges.
//!
//! Both are immutable once built and validate their own invariants at
//! construction; graph-wide invariants live in [`crate::graph`].

pub mod component;
pub mod constraint;

pub use component::{Availability, Component, Percent};
pub use constraint::{Constraint, ConstraintType};
