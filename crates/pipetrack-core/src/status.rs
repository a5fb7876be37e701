//! Condition of a pipeline run or task run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Tri-state outcome of a pipeline run or task run.
///
/// Mirrors the `status` field of a `Succeeded` condition on the cluster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Still running (or not reported yet).
    #[default]
    Unknown,
    /// Finished successfully.
    True,
    /// Finished with a failure.
    False,
}

impl Condition {
    /// Returns true if the run has reached a final outcome.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::True | Self::False)
    }

    /// Parse a wire value, treating anything unrecognised or absent as `Unknown`.
    pub fn from_wire(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    /// The wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::True => "True",
            Self::False => "False",
        }
    }
}

impl FromStr for Condition {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unknown" => Ok(Self::Unknown),
            "True" => Ok(Self::True),
            "False" => Ok(Self::False),
            other => Err(CoreError::InvalidCondition(other.to_string())),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!Condition::Unknown.is_terminal());
        assert!(Condition::True.is_terminal());
        assert!(Condition::False.is_terminal());
    }

    #[test]
    fn test_from_wire_defaults_to_unknown() {
        assert_eq!(Condition::from_wire(Some("True")), Condition::True);
        assert_eq!(Condition::from_wire(Some("False")), Condition::False);
        assert_eq!(Condition::from_wire(Some("maybe")), Condition::Unknown);
        assert_eq!(Condition::from_wire(None), Condition::Unknown);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            "yes".parse::<Condition>(),
            Err(CoreError::InvalidCondition("yes".to_string()))
        );
    }
}
