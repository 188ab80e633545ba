//! Human approval of guardrail evaluations
//!
//! Every edge needs sign-off, whatever its verdict. [`ApprovalGate::review`]
//! checks a request against the matched rule's requirement and reports all
//! failed checks at once, in a fixed order:
//! 1. a purpose is set
//! 2. power mode, when the rule is power-mode only
//! 3. enough distinct approvers
//! 4. rationale long enough
//! 5. purpose alignment confirmed, when configured

use crate::config::{GovernanceConfig, DEFAULT_MIN_RATIONALE_CHARS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tg_guardrail::GuardrailEvaluation;
use tg_model::{Purpose, Verdict};

/// Category of the approver's reasoning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RationaleType {
    /// Required by a standard (ISO/IEC/IEEE and the like)
    #[default]
    StandardCompliance,
    MinimalImpact,
    SchedulePriority,
    QualityPriority,
    SecurityPriority,
    Other,
}

impl RationaleType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StandardCompliance => "standard_compliance",
            Self::MinimalImpact => "minimal_impact",
            Self::SchedulePriority => "schedule_priority",
            Self::QualityPriority => "quality_priority",
            Self::SecurityPriority => "security_priority",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RationaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the approvers submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub purpose: Purpose,
    pub approvers: Vec<String>,
    pub rationale: String,
    #[serde(default)]
    pub rationale_type: RationaleType,
    /// Issue, standard or design references
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback_condition: Option<String>,
    /// Approvers confirmed the change serves the purpose
    #[serde(default)]
    pub purpose_aligned: bool,
}

impl ApprovalRequest {
    /// Request from a single approver, alignment not yet confirmed
    #[must_use]
    pub fn new(purpose: Purpose, approver: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self {
            purpose,
            approvers: vec![approver.into()],
            rationale: rationale.into(),
            rationale_type: RationaleType::default(),
            references: Vec::new(),
            rollback_condition: None,
            purpose_aligned: false,
        }
    }

    /// Add another approver
    #[must_use]
    pub fn with_approver(mut self, approver: impl Into<String>) -> Self {
        self.approvers.push(approver.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_rationale_type(mut self, rationale_type: RationaleType) -> Self {
        self.rationale_type = rationale_type;
        self
    }

    #[must_use]
    pub fn with_references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.references = references.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_rollback_condition(mut self, condition: impl Into<String>) -> Self {
        self.rollback_condition = Some(condition.into());
        self
    }

    /// Confirm the change serves the purpose
    #[inline]
    #[must_use]
    pub fn aligned(mut self) -> Self {
        self.purpose_aligned = true;
        self
    }

    /// Trimmed, non-blank approvers in first-seen order, without repeats
    #[must_use]
    pub fn distinct_approvers(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(self.approvers.len());
        for approver in &self.approvers {
            let name = approver.trim();
            if !name.is_empty() && !out.iter().any(|seen| seen == name) {
                out.push(name.to_string());
            }
        }
        out
    }
}

/// A single failed approval check
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApprovalCheck {
    #[error("no purpose is set; define a goal and scope first")]
    PurposeNotSet,

    #[error("rule {rule_id} can only be approved in power mode")]
    PowerModeRequired { rule_id: String },

    #[error("{required} distinct approver(s) required, got {found}")]
    InsufficientApprovers { required: u8, found: usize },

    #[error("rationale must be at least {min} characters, got {found}")]
    RationaleTooShort { min: usize, found: usize },

    #[error("purpose alignment has not been confirmed")]
    PurposeNotAligned,
}

/// Approval refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("approval under rule {rule_id} denied: {}", join_checks(.failures))]
pub struct ApprovalError {
    pub rule_id: String,
    /// Every failed check, in review order
    pub failures: Vec<ApprovalCheck>,
}

impl ApprovalError {
    #[must_use]
    pub fn has(&self, check: &ApprovalCheck) -> bool {
        self.failures.contains(check)
    }
}

fn join_checks(failures: &[ApprovalCheck]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A granted approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    pub rule_id: String,
    pub verdict: Verdict,
    pub approvers: Vec<String>,
    /// Trimmed
    pub rationale: String,
    pub rationale_type: RationaleType,
    pub references: Vec<String>,
    pub rollback_condition: Option<String>,
    pub purpose: Purpose,
    pub approved_at: DateTime<Utc>,
}

impl Approval {
    /// Approvers joined for the ledger's `approver` field
    #[must_use]
    pub fn approver_line(&self) -> String {
        self.approvers.join(", ")
    }
}

/// Checks approval requests against matched rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalGate {
    min_rationale_chars: usize,
    require_purpose_alignment: bool,
}

impl ApprovalGate {
    /// Gate with default thresholds
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_rationale_chars: DEFAULT_MIN_RATIONALE_CHARS,
            require_purpose_alignment: true,
        }
    }

    /// Gate configured from governance settings
    #[must_use]
    pub fn from_config(config: &GovernanceConfig) -> Self {
        Self {
            min_rationale_chars: config.min_rationale_chars,
            require_purpose_alignment: config.require_purpose_alignment,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_min_rationale_chars(mut self, chars: usize) -> Self {
        self.min_rationale_chars = chars;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_purpose_alignment(mut self, required: bool) -> Self {
        self.require_purpose_alignment = required;
        self
    }

    #[inline]
    #[must_use]
    pub const fn min_rationale_chars(&self) -> usize {
        self.min_rationale_chars
    }

    /// Review a request against an evaluation
    ///
    /// # Errors
    /// Returns [`ApprovalError`] listing every failed check.
    pub fn review(
        &self,
        evaluation: &GuardrailEvaluation,
        request: &ApprovalRequest,
    ) -> Result<Approval, ApprovalError> {
        let rule_id = evaluation.rule_id().to_string();
        let approvers = request.distinct_approvers();
        let rationale = request.rationale.trim();
        let mut failures = Vec::new();

        if !request.purpose.is_set() {
            failures.push(ApprovalCheck::PurposeNotSet);
        }
        if evaluation.power_mode_only() && !request.purpose.is_power_mode() {
            failures.push(ApprovalCheck::PowerModeRequired {
                rule_id: rule_id.clone(),
            });
        }
        let required = evaluation.approver_count();
        if approvers.len() < usize::from(required) {
            failures.push(ApprovalCheck::InsufficientApprovers {
                required,
                found: approvers.len(),
            });
        }
        let rationale_chars = rationale.chars().count();
        // Fallback evaluations still land in the ledger, which needs a rationale.
        let min = self.min_rationale_chars.max(1);
        if rationale_chars < min {
            failures.push(ApprovalCheck::RationaleTooShort {
                min,
                found: rationale_chars,
            });
        }
        if self.require_purpose_alignment && !request.purpose_aligned {
            failures.push(ApprovalCheck::PurposeNotAligned);
        }

        if !failures.is_empty() {
            tracing::warn!(
                rule_id = %rule_id,
                failed = failures.len(),
                "approval denied"
            );
            return Err(ApprovalError { rule_id, failures });
        }

        tracing::info!(
            rule_id = %rule_id,
            verdict = %evaluation.verdict,
            approvers = approvers.len(),
            "approval granted"
        );

        Ok(Approval {
            rule_id,
            verdict: evaluation.verdict,
            approvers,
            rationale: rationale.to_string(),
            rationale_type: request.rationale_type,
            references: request.references.clone(),
            rollback_condition: request.rollback_condition.clone(),
            purpose: request.purpose.clone(),
            approved_at: Utc::now(),
        })
    }
}

impl Default for ApprovalGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tg_guardrail::{GuardrailEngine, RuleTable};
    use tg_model::{EditMode, NodeType};

    fn purpose() -> Purpose {
        Purpose::new("trace checkout rules", "checkout module")
    }

    fn eval(table: RuleTable, source: NodeType, target: NodeType) -> GuardrailEvaluation {
        GuardrailEngine::new(table).evaluate_edge(source, target, "S", "T")
    }

    #[test]
    fn complete_request_is_approved() {
        let evaluation = eval(RuleTable::strict(), NodeType::Requirement, NodeType::Feature);
        let request = ApprovalRequest::new(purpose(), " alice ", "  feature realizes BR-001  ").aligned();
        let approval = ApprovalGate::new().review(&evaluation, &request).unwrap();
        assert_eq!(approval.rule_id, "R001");
        assert_eq!(approval.approvers, vec!["alice"]);
        assert_eq!(approval.rationale, "feature realizes BR-001");
        assert_eq!(approval.verdict, Verdict::Allowed);
    }

    #[test]
    fn every_failed_check_is_listed_in_order() {
        let evaluation = eval(RuleTable::strict(), NodeType::Feature, NodeType::Requirement);
        let request = ApprovalRequest::new(Purpose::default(), "alice", "short");
        let err = ApprovalGate::new().review(&evaluation, &request).unwrap_err();
        assert_eq!(
            err.failures,
            vec![
                ApprovalCheck::PurposeNotSet,
                ApprovalCheck::PowerModeRequired {
                    rule_id: "R005".to_string()
                },
                ApprovalCheck::InsufficientApprovers { required: 2, found: 1 },
                ApprovalCheck::RationaleTooShort { min: 10, found: 5 },
                ApprovalCheck::PurposeNotAligned,
            ]
        );
        assert!(err.to_string().starts_with("approval under rule R005 denied: "));
    }

    #[test]
    fn duplicate_and_blank_approvers_do_not_count() {
        let evaluation = eval(RuleTable::strict(), NodeType::Feature, NodeType::Test);
        let request = ApprovalRequest::new(purpose().with_mode(EditMode::Power), "alice", "reversed on purpose")
            .with_approver("alice ")
            .with_approver("   ")
            .aligned();
        let err = ApprovalGate::new().review(&evaluation, &request).unwrap_err();
        assert_eq!(
            err.failures,
            vec![ApprovalCheck::InsufficientApprovers { required: 2, found: 1 }]
        );

        let request = request.with_approver("bob");
        assert!(ApprovalGate::new().review(&evaluation, &request).is_ok());
    }

    #[test]
    fn rationale_length_counts_characters() {
        let evaluation = eval(RuleTable::strict(), NodeType::Requirement, NodeType::Feature);
        let request = ApprovalRequest::new(purpose(), "alice", "機能を追加する").aligned();
        let err = ApprovalGate::new().review(&evaluation, &request).unwrap_err();
        assert_eq!(err.failures, vec![ApprovalCheck::RationaleTooShort { min: 10, found: 7 }]);

        let request = ApprovalRequest::new(purpose(), "alice", "要件を満たすため機能を追加").aligned();
        assert!(ApprovalGate::new().review(&evaluation, &request).is_ok());
    }

    #[test]
    fn alignment_can_be_optional() {
        let evaluation = eval(RuleTable::strict(), NodeType::Requirement, NodeType::Feature);
        let request = ApprovalRequest::new(purpose(), "alice", "feature realizes BR-001");
        assert!(ApprovalGate::new().review(&evaluation, &request).is_err());
        let gate = ApprovalGate::new().with_purpose_alignment(false);
        assert!(gate.review(&evaluation, &request).is_ok());
    }

    #[test]
    fn rationale_type_wire_names() {
        let json = serde_json::to_string(&RationaleType::SecurityPriority);
        assert_eq!(json.ok().as_deref(), Some("\"security_priority\""));
    }
}
