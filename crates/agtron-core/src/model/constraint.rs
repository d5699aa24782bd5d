use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::SystemError;

/// The two recognized constraint strengths.
///
/// Both participate identically in cycle and availability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintType {
    #[default]
    Hard,
    Soft,
}

impl ConstraintType {
    pub const ALL: [Self; 2] = [Self::Hard, Self::Soft];

    const fn as_str(self) -> &'static str {
        match self {
            Self::Hard => "hard",
            Self::Soft => "soft",
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstraintType {
    type Err = SystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hard" => Ok(Self::Hard),
            "soft" => Ok(Self::Soft),
            _ => Err(SystemError::InvalidConstraintType {
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Constraint
// ---------------------------------------------------------------------------

/// A directed edge: `origin` depends on `dependent`.
///
/// Endpoints are plain identifiers. They may name a component that is not
/// part of the system (an external dependency).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Constraint {
    #[serde(rename = "type")]
    kind: ConstraintType,
    origin: String,
    dependent: String,
}

impl Constraint {
    /// Build a constraint, rejecting empty endpoints and self-loops.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidConstraintEndpoints`] if either endpoint is
    /// empty or both endpoints are the same identifier.
    pub fn new(
        kind: ConstraintType,
        origin: impl Into<String>,
        dependent: impl Into<String>,
    ) -> Result<Self, SystemError> {
        let origin = origin.into();
        let dependent = dependent.into();

        let reason = if origin.is_empty() || dependent.is_empty() {
            Some("origin and dependent must be non-empty")
        } else if origin == dependent {
            Some("origin and dependent must be different")
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(SystemError::InvalidConstraintEndpoints {
                origin,
                dependent,
                reason,
            });
        }

        Ok(Self {
            kind,
            origin,
            dependent,
        })
    }

    /// Shorthand for a [`ConstraintType::Hard`] constraint.
    ///
    /// # Errors
    ///
    /// See [`Constraint::new`].
    pub fn hard(
        origin: impl Into<String>,
        dependent: impl Into<String>,
    ) -> Result<Self, SystemError> {
        Self::new(ConstraintType::Hard, origin, dependent)
    }

    /// Shorthand for a [`ConstraintType::Soft`] constraint.
    ///
    /// # Errors
    ///
    /// See [`Constraint::new`].
    pub fn soft(
        origin: impl Into<String>,
        dependent: impl Into<String>,
    ) -> Result<Self, SystemError> {
        Self::new(ConstraintType::Soft, origin, dependent)
    }

    /// Build a constraint from a textual type such as `"hard"`.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidConstraintType`] for unrecognized types,
    /// or any error from [`Constraint::new`].
    pub fn parse(
        kind: &str,
        origin: impl Into<String>,
        dependent: impl Into<String>,
    ) -> Result<Self, SystemError> {
        Self::new(kind.parse()?, origin, dependent)
    }

    #[must_use]
    pub const fn kind(&self) -> ConstraintType {
        self.kind
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn dependent(&self) -> &str {
        &self.dependent
    }

    /// Returns `true` if this edge is exactly `origin → dependent`.
    #[must_use]
    pub fn connects(&self, origin: &str, dependent: &str) -> bool {
        self.origin == origin && self.dependent == dependent
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.origin, self.dependent, self.kind)
    }
}
