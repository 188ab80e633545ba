//! Guardrail engine
//!
//! Classifies proposed edges against an injected [`RuleTable`]. Evaluation
//! is pure and total: every well-typed proposal gets an evaluation, falling
//! back to the configured `R000` rule when nothing in the table matches.

use crate::error::GuardrailError;
use crate::evaluation::{EdgeProposal, GuardrailEvaluation};
use crate::message;
use crate::normalize;
use crate::rule::{FallbackPolicy, GuardrailRule};
use crate::table::RuleTable;
use std::sync::Arc;
use tg_model::NodeType;

/// Table-driven connection guardrail
///
/// Cheap to clone; the rule table is shared and never mutated.
#[derive(Debug, Clone)]
pub struct GuardrailEngine {
    table: Arc<RuleTable>,
    fallback: GuardrailRule,
}

impl GuardrailEngine {
    /// Create engine over a rule table, with default-allow fallback
    #[inline]
    #[must_use]
    pub fn new(table: RuleTable) -> Self {
        Self {
            table: Arc::new(table),
            fallback: FallbackPolicy::Allow.rule(),
        }
    }

    /// With the rule reported for unmatched pairs
    #[inline]
    #[must_use]
    pub fn with_fallback(mut self, rule: GuardrailRule) -> Self {
        self.fallback = rule;
        self
    }

    /// With one of the built-in fallback policies
    #[inline]
    #[must_use]
    pub fn with_fallback_policy(self, policy: FallbackPolicy) -> Self {
        self.with_fallback(policy.rule())
    }

    /// Evaluate a proposed edge
    #[must_use]
    pub fn evaluate(&self, proposal: &EdgeProposal) -> GuardrailEvaluation {
        let rule = self
            .table
            .find(proposal.source_type, proposal.target_type)
            .unwrap_or(&self.fallback);

        let message = message::render(
            rule.verdict,
            proposal.source_type,
            proposal.target_type,
            &proposal.source_label,
            &proposal.target_label,
            rule,
        );

        tracing::debug!(
            rule_id = %rule.rule_id,
            verdict = %rule.verdict,
            "evaluated {} → {}",
            proposal.source_type,
            proposal.target_type
        );

        GuardrailEvaluation {
            verdict: rule.verdict,
            matched_rule: rule.clone(),
            edge_color: rule.edge_color.clone(),
            message,
            approval_required: true,
            reason_required: rule.approval_requirement.reason_required,
            normalization: normalize::suggest(proposal, rule),
        }
    }

    /// Evaluate from node types and labels, without stable ids
    #[must_use]
    pub fn evaluate_edge(
        &self,
        source_type: NodeType,
        target_type: NodeType,
        source_label: &str,
        target_label: &str,
    ) -> GuardrailEvaluation {
        self.evaluate(&EdgeProposal::new(source_type, source_label, target_type, target_label))
    }

    /// Evaluate from untyped node type names
    ///
    /// # Errors
    /// Returns [`GuardrailError::InvalidArgument`] if either type name is not
    /// a known node type.
    pub fn evaluate_raw(
        &self,
        source_type: &str,
        target_type: &str,
        source_label: &str,
        target_label: &str,
    ) -> Result<GuardrailEvaluation, GuardrailError> {
        let source: NodeType = source_type.parse()?;
        let target: NodeType = target_type.parse()?;
        Ok(self.evaluate_edge(source, target, source_label, target_label))
    }

    /// Rules in table order
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &[GuardrailRule] {
        self.table.rules()
    }

    /// Rule by id, including the fallback rule
    #[must_use]
    pub fn rule_by_id(&self, rule_id: &str) -> Option<&GuardrailRule> {
        self.table
            .get(rule_id)
            .or_else(|| (self.fallback.rule_id == rule_id).then_some(&self.fallback))
    }

    /// The rule table
    #[inline]
    #[must_use]
    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// The rule reported for unmatched pairs
    #[inline]
    #[must_use]
    pub fn fallback(&self) -> &GuardrailRule {
        &self.fallback
    }
}

impl Default for GuardrailEngine {
    fn default() -> Self {
        Self::new(RuleTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::FALLBACK_RULE_ID;
    use tg_model::Verdict;
    use NodeType::{Feature, Requirement, Test};

    #[test]
    fn requirement_to_feature_is_allowed() {
        let engine = GuardrailEngine::default();
        let eval = engine.evaluate_edge(Requirement, Feature, "BR-001", "Feature-001");
        assert_eq!(eval.verdict, Verdict::Allowed);
        assert_eq!(eval.rule_id(), "R001");
        assert!(eval.message.contains("BR-001"));
        assert!(eval.message.contains("Feature-001"));
        assert!(eval.approval_required);
        assert!(!eval.reason_required);
        assert!(eval.normalization.is_none());
    }

    #[test]
    fn unmatched_pair_falls_back_to_r000() {
        let engine = GuardrailEngine::default();
        let eval = engine.evaluate_edge(Feature, Feature, "F-1", "F-2");
        assert_eq!(eval.verdict, Verdict::Allowed);
        assert_eq!(eval.rule_id(), FALLBACK_RULE_ID);
        assert_eq!(eval.approver_count(), 1);
        assert!(!eval.reason_required);
        assert!(eval.approval_required);
    }

    #[test]
    fn fallback_is_configurable() {
        let engine = GuardrailEngine::default().with_fallback_policy(FallbackPolicy::Forbid);
        let eval = engine.evaluate_edge(Test, Test, "T-1", "T-2");
        assert_eq!(eval.verdict, Verdict::Forbidden);
        assert_eq!(eval.rule_id(), FALLBACK_RULE_ID);
        assert!(eval.power_mode_only());
    }

    #[test]
    fn evaluate_raw_rejects_unknown_types() {
        let engine = GuardrailEngine::default();
        let err = engine.evaluate_raw("epic", "feature", "E", "F").unwrap_err();
        assert!(matches!(err, GuardrailError::InvalidArgument(msg) if msg.contains("epic")));
        let ok = engine.evaluate_raw("test", "feature", "T", "F").unwrap();
        assert_eq!(ok.rule_id(), "R002");
    }

    #[test]
    fn rule_lookup_includes_fallback() {
        let engine = GuardrailEngine::default();
        assert_eq!(engine.rules().len(), 6);
        assert_eq!(engine.rule_by_id("R004").unwrap().verdict, Verdict::Warning);
        assert_eq!(engine.rule_by_id(FALLBACK_RULE_ID).unwrap().verdict, Verdict::Allowed);
        assert!(engine.rule_by_id("R999").is_none());
    }

    #[test]
    fn edge_color_comes_from_rule() {
        let engine = GuardrailEngine::default();
        let eval = engine.evaluate_edge(Feature, Requirement, "F", "R");
        assert_eq!(eval.edge_color, "#EF4444");
    }
}
