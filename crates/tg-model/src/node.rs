//! Node and edge vocabulary of the traceability graph
//!
//! Provides [`NodeType`] (requirement, feature, test) and [`EdgeType`]
//! (implements, tests, verifies).

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Kind of a traceability graph node
///
/// Immutable tag on a node; the guardrail engine keys its rules on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Business or system requirement
    Requirement,
    /// Feature implementing one or more requirements
    Feature,
    /// Test verifying a feature or requirement
    Test,
}

impl NodeType {
    /// All node types, in declaration order
    pub const ALL: [NodeType; 3] = [NodeType::Requirement, NodeType::Feature, NodeType::Test];

    /// Wire name of the node type
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requirement => "requirement",
            Self::Feature => "feature",
            Self::Test => "test",
        }
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requirement" => Ok(Self::Requirement),
            "feature" => Ok(Self::Feature),
            "test" => Ok(Self::Test),
            other => Err(ModelError::UnknownNodeType(other.to_string())),
        }
    }
}

/// Semantic relationship carried by an edge
///
/// Independent of the guardrail verdict for the same edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// requirement → feature
    Implements,
    /// test → feature
    Tests,
    /// test → requirement
    Verifies,
}

impl EdgeType {
    /// Canonical edge type for a source/target pair, if the pair has one
    #[must_use]
    pub const fn canonical_for(source: NodeType, target: NodeType) -> Option<Self> {
        match (source, target) {
            (NodeType::Requirement, NodeType::Feature) => Some(Self::Implements),
            (NodeType::Test, NodeType::Feature) => Some(Self::Tests),
            (NodeType::Test, NodeType::Requirement) => Some(Self::Verifies),
            _ => None,
        }
    }

    /// Wire name of the edge type
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Implements => "implements",
            Self::Tests => "tests",
            Self::Verifies => "verifies",
        }
    }
}

impl Display for EdgeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EdgeType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "implements" => Ok(Self::Implements),
            "tests" => Ok(Self::Tests),
            "verifies" => Ok(Self::Verifies),
            other => Err(ModelError::UnknownEdgeType(other.to_string())),
        }
    }
}

/// Errors raised when parsing model vocabulary from strings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Not one of requirement, feature, test
    #[error("unknown node type: '{0}'")]
    UnknownNodeType(String),

    /// Not one of implements, tests, verifies
    #[error("unknown edge type: '{0}'")]
    UnknownEdgeType(String),

    /// Not one of allowed, warning, forbidden
    #[error("unknown verdict: '{0}'")]
    UnknownVerdict(String),
}
