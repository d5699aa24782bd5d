use std::fmt;

/// Machine-readable error codes for tooling and scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidAvailability,
    InvalidConstraintType,
    InvalidConstraintEndpoints,
    InvalidSystemInput,
    CyclicDependency,
    AvailabilityConstraintViolation,
    ConfigParseError,
    ManifestUnreadable,
    ManifestParseError,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidAvailability => "E1001",
            Self::InvalidConstraintType => "E1002",
            Self::InvalidConstraintEndpoints => "E1003",
            Self::InvalidSystemInput => "E1004",
            Self::CyclicDependency => "E2001",
            Self::AvailabilityConstraintViolation => "E2002",
            Self::ConfigParseError => "E3001",
            Self::ManifestUnreadable => "E3002",
            Self::ManifestParseError => "E3003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidAvailability => "Availability must be a number or 'unknown'",
            Self::InvalidConstraintType => "Invalid constraint type",
            Self::InvalidConstraintEndpoints => "Invalid constraint endpoints",
            Self::InvalidSystemInput => "Invalid system input",
            Self::CyclicDependency => "Cyclic dependency detected",
            Self::AvailabilityConstraintViolation => "Invalid availability constraint",
            Self::ConfigParseError => "Config file parse error",
            Self::ManifestUnreadable => "Manifest file could not be read",
            Self::ManifestParseError => "Manifest is not valid YAML",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidAvailability => {
                Some("Use a numeric percentage such as 99.9, or the string 'unknown'.")
            }
            Self::InvalidConstraintType => Some("Use 'hard' or 'soft'."),
            Self::InvalidConstraintEndpoints => {
                Some("A dependency needs two distinct, non-empty service names.")
            }
            Self::InvalidSystemInput => {
                Some("The manifest must be a list of `- service: <name>` entries.")
            }
            Self::CyclicDependency => Some("Remove a dependency to keep the graph acyclic."),
            Self::AvailabilityConstraintViolation => Some(
                "Raise the dependency's availability or lower the dependent's; \
                 `agt recommend` shows the admissible range.",
            ),
            Self::ConfigParseError => Some("Fix syntax in .agtron/config.toml and retry."),
            Self::ManifestUnreadable => Some("Check the path passed to --manifest."),
            Self::ManifestParseError => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Formats a percentage so whole numbers keep their decimal point (`99.0`, not `99`).
pub(crate) struct Pct(pub f64);

impl Pct {
    /// Error-format arguments are bound by reference.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(crate) fn of(value: &f64) -> Self {
        Self(*value)
    }
}

impl fmt::Display for Pct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SystemError
// ---------------------------------------------------------------------------

/// Errors raised while building or mutating a [`System`](crate::graph::System).
///
/// All of these are fail-fast. Queries never produce them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SystemError {
    /// A component availability is neither a finite number nor `unknown`.
    #[error("Availability must be a number or 'unknown' (got {value})")]
    InvalidAvailability { value: String },

    /// A constraint type is neither `hard` nor `soft`.
    #[error("Invalid constraint type: {value}")]
    InvalidConstraintType { value: String },

    /// A constraint endpoint is missing, or both endpoints are the same.
    #[error("Invalid constraint {origin:?} -> {dependent:?}: {reason}")]
    InvalidConstraintEndpoints {
        origin: String,
        dependent: String,
        reason: &'static str,
    },

    /// The input describing a system has the wrong shape.
    #[error("Invalid system: {0}")]
    InvalidSystemInput(String),

    /// The constraint graph contains a cycle.
    #[error("Cyclic dependency detected: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// A component depends on something strictly less available than itself.
    #[error(
        "Invalid availability constraint: {component} ({}) depends on {dependency} ({}), \
         but dependency has lower availability",
        Pct::of(.availability),
        Pct::of(.dependency_availability)
    )]
    AvailabilityConstraintViolation {
        component: String,
        availability: f64,
        dependency: String,
        dependency_availability: f64,
    },
}

impl SystemError {
    /// The machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidAvailability { .. } => ErrorCode::InvalidAvailability,
            Self::InvalidConstraintType { .. } => ErrorCode::InvalidConstraintType,
            Self::InvalidConstraintEndpoints { .. } => ErrorCode::InvalidConstraintEndpoints,
            Self::InvalidSystemInput(_) => ErrorCode::InvalidSystemInput,
            Self::CyclicDependency { .. } => ErrorCode::CyclicDependency,
            Self::AvailabilityConstraintViolation { .. } => {
                ErrorCode::AvailabilityConstraintViolation
            }
        }
    }
}
