//! Guardrail rules
//!
//! A [`GuardrailRule`] pairs a source/target [`RulePattern`] with a verdict,
//! a display color and the approval it demands.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use tg_model::{NodeType, Verdict};

/// Wildcard token in rule patterns
pub const WILDCARD: &str = "*";

/// One side of a rule pattern: a concrete node type or `*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypePattern {
    /// Matches any node type
    Any,
    /// Matches exactly this node type
    Exact(NodeType),
}

impl TypePattern {
    /// Does this side match the given node type
    #[inline]
    #[must_use]
    pub fn matches(self, node_type: NodeType) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == node_type,
        }
    }

    /// The concrete type, if this side is not a wildcard
    #[inline]
    #[must_use]
    pub const fn exact(self) -> Option<NodeType> {
        match self {
            Self::Any => None,
            Self::Exact(t) => Some(t),
        }
    }
}

impl Display for TypePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(WILDCARD),
            Self::Exact(t) => Display::fmt(t, f),
        }
    }
}

impl TryFrom<String> for TypePattern {
    type Error = tg_model::ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == WILDCARD {
            Ok(Self::Any)
        } else {
            value.parse().map(Self::Exact)
        }
    }
}

impl From<TypePattern> for String {
    fn from(pattern: TypePattern) -> Self {
        pattern.to_string()
    }
}

impl From<NodeType> for TypePattern {
    fn from(t: NodeType) -> Self {
        Self::Exact(t)
    }
}

/// Source/target pattern of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RulePattern {
    pub source_type: TypePattern,
    pub target_type: TypePattern,
}

impl RulePattern {
    /// Pattern matching exactly one source/target pair
    #[inline]
    #[must_use]
    pub fn exact(source: NodeType, target: NodeType) -> Self {
        Self {
            source_type: TypePattern::Exact(source),
            target_type: TypePattern::Exact(target),
        }
    }

    /// Pattern matching every pair
    #[inline]
    #[must_use]
    pub const fn any() -> Self {
        Self {
            source_type: TypePattern::Any,
            target_type: TypePattern::Any,
        }
    }

    /// Does the pattern match this pair
    #[inline]
    #[must_use]
    pub fn matches(&self, source: NodeType, target: NodeType) -> bool {
        self.source_type.matches(source) && self.target_type.matches(target)
    }

    /// Both sides are concrete types
    #[inline]
    #[must_use]
    pub fn as_exact(&self) -> Option<(NodeType, NodeType)> {
        Some((self.source_type.exact()?, self.target_type.exact()?))
    }
}

impl Display for RulePattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.source_type, self.target_type)
    }
}

/// Sign-off a matched rule demands before the edge may be committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ApprovalRequirement {
    /// Distinct approvers needed (1 or 2)
    pub approver_count: u8,
    /// A written reason must accompany the approval
    pub reason_required: bool,
    /// Only approvable while the editor is in power mode
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub power_mode_only: bool,
}

impl ApprovalRequirement {
    /// One approver, no reason required
    #[must_use]
    pub const fn single() -> Self {
        Self {
            approver_count: 1,
            reason_required: false,
            power_mode_only: false,
        }
    }

    /// One approver with a recorded reason
    #[must_use]
    pub const fn single_with_reason() -> Self {
        Self {
            approver_count: 1,
            reason_required: true,
            power_mode_only: false,
        }
    }

    /// Two approvers with a recorded reason, power mode only
    #[must_use]
    pub const fn elevated() -> Self {
        Self {
            approver_count: 2,
            reason_required: true,
            power_mode_only: true,
        }
    }
}

/// A single guardrail policy record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GuardrailRule {
    /// Stable identifier, e.g. `R001`
    pub rule_id: String,
    pub name: String,
    pub pattern: RulePattern,
    pub verdict: Verdict,
    pub edge_color: String,
    pub approval_requirement: ApprovalRequirement,
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    /// Offer swapping the endpoints of a reversed edge
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub auto_normalize: bool,
}

impl GuardrailRule {
    /// Create a rule with the verdict's default color and no references
    #[must_use]
    pub fn new(
        rule_id: impl Into<String>,
        name: impl Into<String>,
        pattern: RulePattern,
        verdict: Verdict,
        approval_requirement: ApprovalRequirement,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            name: name.into(),
            pattern,
            verdict,
            edge_color: verdict.default_color().to_string(),
            approval_requirement,
            rationale: rationale.into(),
            references: Vec::new(),
            auto_normalize: false,
        }
    }

    /// With external-standard citations
    #[must_use]
    pub fn with_references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references = references.into_iter().map(Into::into).collect();
        self
    }

    /// With auto-normalization offer
    #[inline]
    #[must_use]
    pub fn with_auto_normalize(mut self) -> Self {
        self.auto_normalize = true;
        self
    }
}

/// Rule id reported when no table rule matches
pub const FALLBACK_RULE_ID: &str = "R000";

/// How pairs that no rule matches are treated
///
/// Unmatched pairs are novel rather than known-bad, so the default is to
/// allow them. Stricter deployments can choose otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    #[default]
    Allow,
    Warn,
    Forbid,
}

impl FallbackPolicy {
    /// The `R000` rule reported for unmatched pairs under this policy
    #[must_use]
    pub fn rule(self) -> GuardrailRule {
        let (name, verdict, requirement, rationale) = match self {
            Self::Allow => (
                "Default allow",
                Verdict::Allowed,
                ApprovalRequirement::single(),
                "Undefined patterns are allowed",
            ),
            Self::Warn => (
                "Default warn",
                Verdict::Warning,
                ApprovalRequirement::single_with_reason(),
                "Undefined patterns need a recorded reason",
            ),
            Self::Forbid => (
                "Default forbid",
                Verdict::Forbidden,
                ApprovalRequirement::elevated(),
                "Undefined patterns need elevated approval",
            ),
        };
        GuardrailRule::new(FALLBACK_RULE_ID, name, RulePattern::any(), verdict, requirement, rationale)
    }
}
