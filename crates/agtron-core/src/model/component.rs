use serde::{Deserialize, Serialize, Serializer};
use std::{fmt, str::FromStr};

use crate::error::{Pct, SystemError};

/// The literal accepted for an unspecified availability.
pub const UNKNOWN: &str = "unknown";

/// A finite uptime percentage.
///
/// Only [`Availability::known`] can build one, so a [`Component`] never
/// carries NaN or an infinity.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percent(f64);

impl Percent {
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

/// An uptime guarantee: a numeric percentage, or no guarantee at all.
///
/// `Unknown` never takes part in availability comparisons: it imposes no
/// constraint on its dependencies and receives none from its dependents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(try_from = "RawAvailability")]
pub enum Availability {
    Known(Percent),
    #[default]
    Unknown,
}

impl Availability {
    /// Build a numeric availability, rejecting NaN and infinities.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidAvailability`] for non-finite values.
    pub fn known(value: f64) -> Result<Self, SystemError> {
        if value.is_finite() {
            Ok(Self::Known(Percent(value)))
        } else {
            Err(SystemError::InvalidAvailability {
                value: value.to_string(),
            })
        }
    }

    /// The numeric value, or `None` when unknown.
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Known(percent) => Some(percent.0),
            Self::Unknown => None,
        }
    }

    #[must_use]
    pub const fn is_unknown(self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(percent) => write!(f, "{}", Pct(percent.0)),
            Self::Unknown => f.write_str(UNKNOWN),
        }
    }
}

/// Only the exact lowercase literal `unknown` is accepted; `UNKNOWN` or
/// `available` are rejected rather than normalized.
impl FromStr for Availability {
    type Err = SystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == UNKNOWN {
            return Ok(Self::Unknown);
        }
        match trimmed.parse::<f64>() {
            Ok(value) => Self::known(value),
            Err(_) => Err(SystemError::InvalidAvailability {
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for Availability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(percent) => serializer.serialize_f64(percent.0),
            Self::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

/// Wire shape accepted when deserializing: any number, or a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAvailability {
    Number(f64),
    Text(String),
}

impl TryFrom<RawAvailability> for Availability {
    type Error = SystemError;

    fn try_from(raw: RawAvailability) -> Result<Self, Self::Error> {
        match raw {
            RawAvailability::Number(value) => Self::known(value),
            RawAvailability::Text(text) if text == UNKNOWN => Ok(Self::Unknown),
            RawAvailability::Text(text) => Err(SystemError::InvalidAvailability { value: text }),
        }
    }
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// A named service in the system.
///
/// Names are not unique by construction; the system resolves a name to its
/// first component in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    name: String,
    #[serde(default)]
    availability: Availability,
}

impl Component {
    pub fn new(name: impl Into<String>, availability: Availability) -> Self {
        Self {
            name: name.into(),
            availability,
        }
    }

    /// A component with no availability guarantee.
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, Availability::Unknown)
    }

    /// A component with a numeric availability.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::InvalidAvailability`] for non-finite values.
    pub fn with_availability(name: impl Into<String>, percent: f64) -> Result<Self, SystemError> {
        Ok(Self::new(name, Availability::known(percent)?))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn availability(&self) -> Availability {
        self.availability
    }
}
