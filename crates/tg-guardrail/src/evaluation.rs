//! Engine input and output types

use crate::rule::GuardrailRule;
use serde::{Deserialize, Serialize};
use tg_model::{EdgeType, NodeType, Verdict};

/// A proposed edge, as reported by the graph editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeProposal {
    pub source_type: NodeType,
    pub target_type: NodeType,
    pub source_label: String,
    pub target_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
}

impl EdgeProposal {
    /// Create a proposal without stable node ids
    #[must_use]
    pub fn new(
        source_type: NodeType,
        source_label: impl Into<String>,
        target_type: NodeType,
        target_label: impl Into<String>,
    ) -> Self {
        Self {
            source_type,
            target_type,
            source_label: source_label.into(),
            target_label: target_label.into(),
            source_id: None,
            target_id: None,
        }
    }

    /// With stable node ids
    #[must_use]
    pub fn with_ids(mut self, source_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self.target_id = Some(target_id.into());
        self
    }

    /// Stable id of the source, or its label when no id was given
    #[must_use]
    pub fn source_key(&self) -> &str {
        self.source_id.as_deref().unwrap_or(&self.source_label)
    }

    /// Stable id of the target, or its label when no id was given
    #[must_use]
    pub fn target_key(&self) -> &str {
        self.target_id.as_deref().unwrap_or(&self.target_label)
    }

    /// Canonical semantic edge type for this pair, if any
    #[inline]
    #[must_use]
    pub fn canonical_edge_type(&self) -> Option<EdgeType> {
        EdgeType::canonical_for(self.source_type, self.target_type)
    }

    /// The same proposal with endpoints swapped
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            source_type: self.target_type,
            target_type: self.source_type,
            source_label: self.target_label.clone(),
            target_label: self.source_label.clone(),
            source_id: self.target_id.clone(),
            target_id: self.source_id.clone(),
        }
    }
}

/// Suggested endpoint swap for a structurally reversed edge
///
/// Advisory only; the engine never changes the caller's graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Normalization {
    /// The matched rule offers applying the swap directly
    pub can_normalize: bool,
    /// New source: the old target's id (or label)
    pub normalized_source: String,
    /// New target: the old source's id (or label)
    pub normalized_target: String,
    pub reason: String,
}

/// Verdict and explanation for one proposed edge
///
/// Produced per proposal and never persisted; the ledger records the
/// decision taken on it instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardrailEvaluation {
    pub verdict: Verdict,
    pub matched_rule: GuardrailRule,
    pub edge_color: String,
    pub message: String,
    /// Always true: no edge bypasses human sign-off
    pub approval_required: bool,
    pub reason_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalization: Option<Normalization>,
}

impl GuardrailEvaluation {
    /// Id of the matched rule (`R000` for the fallback)
    #[inline]
    #[must_use]
    pub fn rule_id(&self) -> &str {
        &self.matched_rule.rule_id
    }

    /// Distinct approvers the matched rule demands
    #[inline]
    #[must_use]
    pub fn approver_count(&self) -> u8 {
        self.matched_rule.approval_requirement.approver_count
    }

    /// Matched rule is restricted to power mode
    #[inline]
    #[must_use]
    pub fn power_mode_only(&self) -> bool {
        self.matched_rule.approval_requirement.power_mode_only
    }

    /// A normalization is offered and may be applied directly
    #[must_use]
    pub fn can_normalize(&self) -> bool {
        self.normalization.as_ref().is_some_and(|n| n.can_normalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_fall_back_to_labels() {
        let proposal = EdgeProposal::new(NodeType::Feature, "Feature-001", NodeType::Requirement, "BR-002");
        assert_eq!(proposal.source_key(), "Feature-001");
        assert_eq!(proposal.target_key(), "BR-002");

        let proposal = proposal.with_ids("feat-001", "req-002");
        assert_eq!(proposal.source_key(), "feat-001");
        assert_eq!(proposal.target_key(), "req-002");
    }

    #[test]
    fn reversed_swaps_everything() {
        let proposal = EdgeProposal::new(NodeType::Feature, "F", NodeType::Test, "T").with_ids("f", "t");
        let rev = proposal.reversed();
        assert_eq!(rev.source_type, NodeType::Test);
        assert_eq!(rev.source_label, "T");
        assert_eq!(rev.source_id.as_deref(), Some("t"));
        assert_eq!(rev.target_id.as_deref(), Some("f"));
        assert_eq!(rev.reversed(), proposal);
    }

    #[test]
    fn proposal_serde_omits_missing_ids() {
        let proposal = EdgeProposal::new(NodeType::Test, "TC-1", NodeType::Feature, "F-1");
        let json = serde_json::to_value(&proposal).unwrap();
        assert_eq!(json["sourceType"], "test");
        assert!(json.get("sourceId").is_none());
    }
}
