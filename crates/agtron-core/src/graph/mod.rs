//! Dependency graph engine.
//!
//! # Overview
//!
//! A [`System`] owns ordered collections of components and constraints. An
//! edge `A → B` means "A depends on B". Every traversal builds a fresh
//! adjacency view from the constraint list, so queries hold no shared state.
//!
//! ## Submodules
//!
//! - [`system`]: the aggregate, its guarded mutators and direct lookups.
//! - `cycles`: three-color DFS cycle detection.
//! - [`paths`]: reachability and bounded simple-path enumeration.
//! - [`availability`]: transitive availability validation and one-hop range
//!   recommendation.
//! - [`export`]: a petgraph view for ordering and Graphviz rendering.
//!
//! ## Pipeline
//!
//! ```text
//! (Vec<Component>, Vec<Constraint>)
//!        ↓  System::new()
//! validate: find_cycle → check_availability
//!        ↓
//! System ── queries ──→ bool / ConstraintPath / AvailabilityRange
//!        ↓  DependencyGraph::from_system()
//! petgraph DiGraph ──→ deployment order / DOT
//! ```

pub mod availability;
mod cycles;
pub mod export;
mod index;
pub mod paths;
pub mod system;

pub use availability::{AvailabilityRange, MAX_AVAILABILITY, MIN_AVAILABILITY};
pub use export::DependencyGraph;
pub use paths::{ConstraintPath, MAX_PATH_LEN};
pub use system::System;
