//! Guardrail verdicts

use crate::node::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Classification of a proposed edge
///
/// Ordered by severity: `Allowed < Warning < Forbidden`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Connection follows a canonical traceability flow
    Allowed,
    /// Connection is valid but unusual; a reason must be recorded
    Warning,
    /// Connection inverts traceability; needs elevated approval
    Forbidden,
}

impl Verdict {
    /// Wire name of the verdict
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Warning => "warning",
            Self::Forbidden => "forbidden",
        }
    }

    /// Default display color for edges with this verdict
    #[inline]
    #[must_use]
    pub const fn default_color(self) -> &'static str {
        match self {
            Self::Allowed => "#3B82F6",
            Self::Warning => "#EAB308",
            Self::Forbidden => "#EF4444",
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allowed" => Ok(Self::Allowed),
            "warning" => Ok(Self::Warning),
            "forbidden" => Ok(Self::Forbidden),
            other => Err(ModelError::UnknownVerdict(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_ordering_is_severity() {
        assert!(Verdict::Allowed < Verdict::Warning);
        assert!(Verdict::Warning < Verdict::Forbidden);
    }

    #[test]
    fn verdict_round_trips_through_str() {
        for v in [Verdict::Allowed, Verdict::Warning, Verdict::Forbidden] {
            assert_eq!(v.as_str().parse::<Verdict>().unwrap(), v);
        }
        assert!("blocked".parse::<Verdict>().is_err());
    }
}
