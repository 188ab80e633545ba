//! Endpoint-swap suggestions for reversed edges

use crate::evaluation::{EdgeProposal, Normalization};
use crate::rule::GuardrailRule;
use tg_model::NodeType;

/// Reason attached to a feature → requirement swap
pub const REVERSED_REQUIREMENT_REASON: &str =
    "Reversed traceability: requirements point to the features that implement them (requirement → feature)";

/// Reason attached to a feature → test swap
pub const REVERSED_TEST_REASON: &str =
    "Reversed verification: tests point to the features they verify (test → feature)";

/// Reason for swapping this pair, if it is a known reversed pattern
#[must_use]
pub fn reversal_reason(source: NodeType, target: NodeType) -> Option<&'static str> {
    match (source, target) {
        (NodeType::Feature, NodeType::Requirement) => Some(REVERSED_REQUIREMENT_REASON),
        (NodeType::Feature, NodeType::Test) => Some(REVERSED_TEST_REASON),
        _ => None,
    }
}

pub(crate) fn suggest(proposal: &EdgeProposal, rule: &GuardrailRule) -> Option<Normalization> {
    let reason = reversal_reason(proposal.source_type, proposal.target_type)?;
    Some(Normalization {
        can_normalize: rule.auto_normalize,
        normalized_source: proposal.target_key().to_string(),
        normalized_target: proposal.source_key().to_string(),
        reason: reason.to_string(),
    })
}
