//! agtron-core library.
//!
//! Models services as components with an availability guarantee and the
//! directed constraints between them, then answers questions about the
//! resulting dependency graph: is it acyclic, is every service at most as
//! available as what it relies on, how does one service reach another, and
//! what availability should a service target.
//!
//! # Conventions
//!
//! - **Errors**: Library errors are `thiserror` enums ([`SystemError`],
//!   [`manifest::ManifestError`]) carrying an [`ErrorCode`]. Config loading
//!   uses `anyhow::Result`.
//! - **Logging**: Use `tracing` macros (`warn!`, `debug!`, `trace!`).
//!
//! # Modules
//!
//! - [`model`]: components, availability and typed constraints.
//! - [`graph`]: the validated [`System`] and its queries.
//! - [`manifest`]: YAML manifest loading.
//! - [`config`]: project and user configuration.
//! - [`error`]: error types and machine-readable codes.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod model;

pub use error::{ErrorCode, SystemError};
pub use graph::{AvailabilityRange, ConstraintPath, DependencyGraph, System};
pub use model::{Availability, Component, Constraint, ConstraintType};
