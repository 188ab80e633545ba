//! Ordered rule tables
//!
//! A [`RuleTable`] is the whole of the guardrail policy. Two canonical
//! variants ship with the crate:
//!
//! - [`RuleTable::strict`]: reversed edges are forbidden (2 approvers, power mode)
//! - [`RuleTable::lenient`]: reversed edges warn (1 approver) and offer normalization
//!
//! # Lookup
//!
//! A rule whose pattern names both node types exactly wins over any
//! wildcard rule. Among rules of the same kind, the first one listed wins.

use crate::error::GuardrailError;
use crate::rule::{ApprovalRequirement, GuardrailRule, RulePattern};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tg_model::{NodeType, Verdict};

/// Validated, ordered list of guardrail rules
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<GuardrailRule>", into = "Vec<GuardrailRule>")]
pub struct RuleTable {
    rules: Vec<GuardrailRule>,
    exact: HashMap<(NodeType, NodeType), usize>,
    wildcard: Vec<usize>,
}

impl fmt::Debug for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleTable")
            .field("rules", &self.rules.iter().map(|r| r.rule_id.as_str()).collect::<Vec<_>>())
            .field("wildcards", &self.wildcard.len())
            .finish()
    }
}

impl RuleTable {
    /// Build a table from an ordered rule list
    ///
    /// # Errors
    /// Returns [`GuardrailError::InvalidArgument`] if a rule id is blank or
    /// duplicated, or an approver count is outside `1..=2`.
    pub fn new(rules: Vec<GuardrailRule>) -> Result<Self, GuardrailError> {
        let mut seen = HashSet::new();
        let mut exact = HashMap::new();
        let mut wildcard = Vec::new();

        for (idx, rule) in rules.iter().enumerate() {
            if rule.rule_id.trim().is_empty() {
                return Err(GuardrailError::invalid_argument(format!(
                    "rule at position {idx} has an empty id"
                )));
            }
            if !seen.insert(rule.rule_id.as_str()) {
                return Err(GuardrailError::invalid_argument(format!(
                    "duplicate rule id: {}",
                    rule.rule_id
                )));
            }
            let count = rule.approval_requirement.approver_count;
            if !(1..=2).contains(&count) {
                return Err(GuardrailError::invalid_argument(format!(
                    "rule {} requires {count} approvers; expected 1 or 2",
                    rule.rule_id
                )));
            }

            match rule.pattern.as_exact() {
                Some(pair) => {
                    exact.entry(pair).or_insert(idx);
                }
                None => wildcard.push(idx),
            }
        }

        Ok(Self {
            rules,
            exact,
            wildcard,
        })
    }

    /// Strict canonical table
    ///
    /// Reversed edges (feature → requirement, feature → test) are forbidden.
    #[must_use]
    pub fn strict() -> Self {
        Self::from_canonical(canonical_rules(false))
    }

    /// Lenient table
    ///
    /// Reversed edges are downgraded to warnings with a normalization offer.
    #[must_use]
    pub fn lenient() -> Self {
        Self::from_canonical(canonical_rules(true))
    }

    fn from_canonical(rules: Vec<GuardrailRule>) -> Self {
        let mut exact = HashMap::with_capacity(rules.len());
        for (idx, rule) in rules.iter().enumerate() {
            if let Some(pair) = rule.pattern.as_exact() {
                exact.entry(pair).or_insert(idx);
            }
        }
        Self {
            rules,
            exact,
            wildcard: Vec::new(),
        }
    }

    /// First matching rule for a pair, by the lookup order above
    #[must_use]
    pub fn find(&self, source: NodeType, target: NodeType) -> Option<&GuardrailRule> {
        if let Some(&idx) = self.exact.get(&(source, target)) {
            return Some(&self.rules[idx]);
        }
        self.wildcard
            .iter()
            .map(|&idx| &self.rules[idx])
            .find(|rule| rule.pattern.matches(source, target))
    }

    /// Rule by id
    #[must_use]
    pub fn get(&self, rule_id: &str) -> Option<&GuardrailRule> {
        self.rules.iter().find(|r| r.rule_id == rule_id)
    }

    /// Rules in table order
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &[GuardrailRule] {
        &self.rules
    }

    /// Number of rules
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Table has no rules
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::strict()
    }
}

impl TryFrom<Vec<GuardrailRule>> for RuleTable {
    type Error = GuardrailError;

    fn try_from(rules: Vec<GuardrailRule>) -> Result<Self, Self::Error> {
        Self::new(rules)
    }
}

impl From<RuleTable> for Vec<GuardrailRule> {
    fn from(table: RuleTable) -> Self {
        table.rules
    }
}

/// Named table variant, as selected in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableVariant {
    #[default]
    Strict,
    Lenient,
}

impl TableVariant {
    /// Build the table for this variant
    #[must_use]
    pub fn table(self) -> RuleTable {
        match self {
            Self::Strict => RuleTable::strict(),
            Self::Lenient => RuleTable::lenient(),
        }
    }
}

impl FromStr for TableVariant {
    type Err = GuardrailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(GuardrailError::invalid_argument(format!(
                "unknown rule table: '{other}' (expected strict or lenient)"
            ))),
        }
    }
}

fn canonical_rules(lenient: bool) -> Vec<GuardrailRule> {
    use NodeType::{Feature, Requirement, Test};

    let mut rules = vec![
        GuardrailRule::new(
            "R001",
            "Requirement → feature is allowed",
            RulePattern::exact(Requirement, Feature),
            Verdict::Allowed,
            ApprovalRequirement::single(),
            "Standard traceability pattern per ISO/IEC/IEEE 29148",
        )
        .with_references(["ISO/IEC/IEEE 29148:2018 Section 5.2.6"]),
        GuardrailRule::new(
            "R002",
            "Test → feature is allowed",
            RulePattern::exact(Test, Feature),
            Verdict::Allowed,
            ApprovalRequirement::single(),
            "Standard pattern establishing quality assurance of a feature",
        ),
        GuardrailRule::new(
            "R003",
            "Test → requirement is allowed",
            RulePattern::exact(Test, Requirement),
            Verdict::Allowed,
            ApprovalRequirement::single(),
            "Verifies the requirement's acceptance criteria (Given-When-Then)",
        ),
        GuardrailRule::new(
            "R004",
            "Requirement → test warns",
            RulePattern::exact(Requirement, Test),
            Verdict::Warning,
            ApprovalRequirement::single_with_reason(),
            "Test → requirement is the usual direction, but a reference from requirement to test is also valid",
        ),
    ];

    if lenient {
        rules.push(
            GuardrailRule::new(
                "R005",
                "Feature → requirement warns",
                RulePattern::exact(Feature, Requirement),
                Verdict::Warning,
                ApprovalRequirement::single_with_reason(),
                "Reversed connection inverts traceability; swapping the endpoints is offered",
            )
            .with_auto_normalize(),
        );
        rules.push(
            GuardrailRule::new(
                "R006",
                "Feature → test warns",
                RulePattern::exact(Feature, Test),
                Verdict::Warning,
                ApprovalRequirement::single_with_reason(),
                "A test depending on a feature is discouraged; swapping the endpoints is offered",
            )
            .with_auto_normalize(),
        );
    } else {
        rules.push(GuardrailRule::new(
            "R005",
            "Feature → requirement is forbidden",
            RulePattern::exact(Feature, Requirement),
            Verdict::Forbidden,
            ApprovalRequirement::elevated(),
            "Reversed connection inverts traceability and is forbidden in principle",
        ));
        rules.push(GuardrailRule::new(
            "R006",
            "Feature → test is forbidden",
            RulePattern::exact(Feature, Test),
            Verdict::Forbidden,
            ApprovalRequirement::elevated(),
            "A test depending on a feature is discouraged",
        ));
    }

    rules
}
