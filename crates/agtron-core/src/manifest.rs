//! YAML manifest loading.
//!
//! # Format
//!
//! A manifest is a top-level list of service entries:
//!
//! ```yaml
//! - service: web_frontend
//!   availability: 99.5
//!   depends_on:
//!     - api_gateway
//! - service: api_gateway
//!   availability: 99.9
//!   depends_on:
//!     - user_service
//!     - service: metrics
//!       type: soft
//! - service: user_service
//! ```
//!
//! - `availability` is a number or `unknown`; missing means `unknown`.
//! - A `depends_on` element is a service name (a `hard` constraint) or a
//!   mapping with `service` and an optional `type` (`hard` | `soft`).
//! - Entries that are not mappings with a `service` key are ignored.
//! - Dependencies on services that are never defined are kept as external
//!   identifiers.
//! - An empty document is an empty system.

use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tracing::{debug, instrument, trace};

use crate::error::{ErrorCode, SystemError};
use crate::graph::{AvailabilityRange, System};
use crate::model::{Availability, Component, Constraint, ConstraintType};

/// Errors from reading or interpreting a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not valid YAML.
    #[error("manifest is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The document describes an invalid component, constraint, or system.
    #[error(transparent)]
    System(#[from] SystemError),
}

impl ManifestError {
    /// The machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::ManifestUnreadable,
            Self::Yaml(_) => ErrorCode::ManifestParseError,
            Self::System(err) => err.code(),
        }
    }
}

/// Components and constraints read from a manifest, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestParts {
    pub components: Vec<Component>,
    pub constraints: Vec<Constraint>,
}

impl ManifestParts {
    /// Validate the parts into a [`System`].
    ///
    /// # Errors
    ///
    /// Any error from [`System::new`].
    pub fn into_system(self) -> Result<System, SystemError> {
        System::new(self.components, self.constraints)
    }

    /// Run [`System::validate`] without taking ownership.
    ///
    /// # Errors
    ///
    /// The first invariant violation found.
    pub fn validate(&self) -> Result<(), SystemError> {
        crate::graph::system::validate(&self.components, &self.constraints)
    }

    /// The first component named `name`, in manifest order.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|component| component.name() == name)
    }

    /// One-hop availability range for `name`, as
    /// [`System::recommend_availability_range`] computes it, but over parts
    /// that may not validate. The range can therefore be unsatisfiable.
    #[must_use]
    pub fn recommend_availability_range(&self, name: &str) -> AvailabilityRange {
        crate::graph::availability::recommend_range(&self.components, &self.constraints, name)
    }
}

/// Parse a manifest and build a validated [`System`].
///
/// # Errors
///
/// Returns [`ManifestError::Yaml`] for malformed YAML and
/// [`ManifestError::System`] for invalid entries or a system that fails
/// validation.
pub fn parse_str(yaml: &str) -> Result<System, ManifestError> {
    Ok(load_parts(yaml)?.into_system()?)
}

/// Read and parse a manifest file.
///
/// # Errors
///
/// Returns [`ManifestError::Io`] if the file cannot be read, otherwise the
/// same errors as [`parse_str`].
#[instrument]
pub fn parse_file(path: &Path) -> Result<System, ManifestError> {
    Ok(read_parts(path)?.into_system()?)
}

/// Read a manifest file into unvalidated parts.
///
/// # Errors
///
/// Returns [`ManifestError::Io`] if the file cannot be read, otherwise the
/// same errors as [`load_parts`].
pub fn read_parts(path: &Path) -> Result<ManifestParts, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_parts(&content)
}

/// Parse a manifest into components and constraints without validating the
/// graph.
///
/// # Errors
///
/// Returns [`ManifestError::Yaml`] for malformed YAML, or a
/// [`ManifestError::System`] wrapping
/// [`SystemError::InvalidSystemInput`], [`SystemError::InvalidAvailability`],
/// [`SystemError::InvalidConstraintType`] or
/// [`SystemError::InvalidConstraintEndpoints`].
pub fn load_parts(yaml: &str) -> Result<ManifestParts, ManifestError> {
    let mut parts = ManifestParts::default();

    if yaml.trim().is_empty() {
        return Ok(parts);
    }

    let entries = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Null => return Ok(parts),
        Value::Sequence(entries) => entries,
        other => {
            return Err(SystemError::InvalidSystemInput(format!(
                "expected a list of service entries, found {}",
                describe(&other)
            ))
            .into());
        }
    };

    for entry in &entries {
        let Some(mapping) = entry.as_mapping() else {
            trace!(entry = describe(entry), "skipping non-mapping entry");
            continue;
        };
        let Some(service) = mapping.get("service") else {
            trace!("skipping entry without a service key");
            continue;
        };

        let name = identifier(service, "service")?;
        let availability = match mapping.get("availability") {
            Some(value) => availability(value)?,
            None => Availability::Unknown,
        };
        parts.components.push(Component::new(name.clone(), availability));

        for dependency in dependencies(mapping)? {
            let (dependent, kind) = dependency_target(dependency)?;
            parts
                .constraints
                .push(Constraint::new(kind, name.clone(), dependent)?);
        }
    }

    debug!(
        components = parts.components.len(),
        constraints = parts.constraints.len(),
        "manifest loaded"
    );
    Ok(parts)
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Service names may be written as bare scalars (`service: 42`).
fn identifier(value: &Value, field: &str) -> Result<String, SystemError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(SystemError::InvalidSystemInput(format!(
            "`{field}` must be a name, found {}",
            describe(other)
        ))),
    }
}

fn availability(value: &Value) -> Result<Availability, SystemError> {
    match value {
        Value::Number(number) => match number.as_f64() {
            Some(percent) => Availability::known(percent),
            None => Err(SystemError::InvalidAvailability {
                value: number.to_string(),
            }),
        },
        Value::String(text) if text == crate::model::component::UNKNOWN => {
            Ok(Availability::Unknown)
        }
        Value::String(text) => Err(SystemError::InvalidAvailability {
            value: text.clone(),
        }),
        other => Err(SystemError::InvalidAvailability {
            value: describe(other).to_string(),
        }),
    }
}

fn dependencies(mapping: &Mapping) -> Result<&[Value], SystemError> {
    match mapping.get("depends_on") {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Sequence(items)) => Ok(items.as_slice()),
        Some(other) => Err(SystemError::InvalidSystemInput(format!(
            "`depends_on` must be a list, found {}",
            describe(other)
        ))),
    }
}

fn dependency_target(value: &Value) -> Result<(String, ConstraintType), SystemError> {
    let Some(mapping) = value.as_mapping() else {
        return Ok((identifier(value, "depends_on")?, ConstraintType::Hard));
    };

    let service = mapping.get("service").ok_or_else(|| {
        SystemError::InvalidSystemInput("dependency mapping needs a `service` key".to_string())
    })?;
    let kind = match mapping.get("type") {
        None | Some(Value::Null) => ConstraintType::Hard,
        Some(Value::String(text)) => text.parse()?,
        Some(other) => {
            return Err(SystemError::InvalidConstraintType {
                value: describe(other).to_string(),
            });
        }
    };

    Ok((identifier(service, "service")?, kind))
}
