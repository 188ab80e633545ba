//! Evaluate → approve → append
//!
//! [`DecisionPipeline`] ties one engine, one approval gate and one shared
//! ledger together. An edge reaches the ledger only after the engine's
//! current verdict for it has been approved.

use crate::approval::{Approval, ApprovalGate, ApprovalRequest};
use crate::config::GovernanceConfig;
use crate::error::GovernanceError;
use std::sync::Arc;
use tg_guardrail::{EdgeProposal, GuardrailEngine, GuardrailEvaluation};
use tg_ledger::{
    ChainLink, DecisionLedgerEntry, DecisionRecord, ExportMetadata, SharedLedger,
};

/// Action type recorded for approved edges
pub const ADD_EDGE_ACTION: &str = "add_edge";

/// Governs edge additions end to end
#[derive(Debug, Clone)]
pub struct DecisionPipeline {
    engine: Arc<GuardrailEngine>,
    gate: ApprovalGate,
    ledger: SharedLedger,
    signer_fingerprint: String,
}

impl DecisionPipeline {
    /// Create pipeline from parts
    #[must_use]
    pub fn new(
        engine: Arc<GuardrailEngine>,
        gate: ApprovalGate,
        ledger: SharedLedger,
        signer_fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            gate,
            ledger,
            signer_fingerprint: signer_fingerprint.into(),
        }
    }

    /// Pipeline over a fresh ledger, configured from `config`
    #[must_use]
    pub fn from_config(config: &GovernanceConfig) -> Self {
        Self::new(
            Arc::new(config.build_engine()),
            ApprovalGate::from_config(config),
            SharedLedger::new(),
            config.signer_fingerprint.clone(),
        )
    }

    /// Same engine and gate, different ledger
    #[must_use]
    pub fn with_ledger(mut self, ledger: SharedLedger) -> Self {
        self.ledger = ledger;
        self
    }

    #[inline]
    #[must_use]
    pub fn engine(&self) -> &GuardrailEngine {
        &self.engine
    }

    #[inline]
    #[must_use]
    pub fn gate(&self) -> &ApprovalGate {
        &self.gate
    }

    #[inline]
    #[must_use]
    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    /// Evaluate a proposed edge
    #[must_use]
    pub fn propose(&self, proposal: &EdgeProposal) -> GuardrailEvaluation {
        self.engine.evaluate(proposal)
    }

    /// Approve an evaluated edge and append it to the ledger
    ///
    /// `expected_tip` is the tip the caller observed; if another decision
    /// landed first the append fails with a retryable
    /// [`tg_ledger::LedgerError::ChainConflict`].
    ///
    /// # Errors
    /// - [`GovernanceError::EvaluationMismatch`] if `evaluation` is not what
    ///   the engine returns for `proposal`
    /// - [`GovernanceError::ApprovalDenied`] with every failed check
    /// - [`GovernanceError::Ledger`] on a stale tip or incomplete record
    pub fn approve(
        &self,
        proposal: &EdgeProposal,
        evaluation: &GuardrailEvaluation,
        request: &ApprovalRequest,
        expected_tip: &ChainLink,
    ) -> Result<DecisionLedgerEntry, GovernanceError> {
        let current = self.engine.evaluate(proposal);
        if current != *evaluation {
            return Err(GovernanceError::EvaluationMismatch {
                source_label: proposal.source_label.clone(),
                target_label: proposal.target_label.clone(),
                supplied: format!("{} ({})", evaluation.verdict, evaluation.rule_id()),
                current: format!("{} ({})", current.verdict, current.rule_id()),
            });
        }

        let approval = self.gate.review(evaluation, request)?;
        let record = decision_record(proposal, evaluation, &approval);
        let entry = self
            .ledger
            .append(record, expected_tip, &self.signer_fingerprint)?;

        tracing::info!(
            commit_id = %entry.commit_id(),
            rule_id = %approval.rule_id,
            verdict = %approval.verdict,
            "decision recorded"
        );
        Ok(entry)
    }

    /// Approve against whatever the tip is now
    ///
    /// # Errors
    /// Same as [`DecisionPipeline::approve`]; a conflict is still possible if
    /// another writer appends between reading the tip and appending.
    pub fn approve_at_tip(
        &self,
        proposal: &EdgeProposal,
        evaluation: &GuardrailEvaluation,
        request: &ApprovalRequest,
    ) -> Result<DecisionLedgerEntry, GovernanceError> {
        let tip = self.ledger.tip();
        self.approve(proposal, evaluation, request, &tip)
    }

    /// Export the ledger
    ///
    /// # Errors
    /// Returns [`GovernanceError::Ledger`] if encoding fails.
    pub fn export(&self, metadata: ExportMetadata) -> Result<String, GovernanceError> {
        self.ledger.export(metadata).map_err(GovernanceError::from)
    }
}

/// Ledger record for an approved edge
fn decision_record(
    proposal: &EdgeProposal,
    evaluation: &GuardrailEvaluation,
    approval: &Approval,
) -> DecisionRecord {
    let selected_option = format!("{} → {}", proposal.source_key(), proposal.target_key());
    let edge_kind = proposal
        .canonical_edge_type()
        .map_or_else(|| "untyped".to_string(), |t| t.to_string());
    let impact_summary = format!(
        "{} {edge_kind} edge {} → {} under {}",
        evaluation.verdict,
        proposal.source_label,
        proposal.target_label,
        evaluation.rule_id()
    );

    let mut evidence = approval.references.clone();
    for reference in &evaluation.matched_rule.references {
        if !evidence.contains(reference) {
            evidence.push(reference.clone());
        }
    }

    let mut record = DecisionRecord::new(
        approval.purpose.summary(),
        ADD_EDGE_ACTION,
        selected_option,
        approval.rationale.clone(),
        approval.approver_line(),
        impact_summary,
    )
    .with_timestamp(approval.approved_at)
    .with_rules_matched([evaluation.rule_id()])
    .with_evidence(evidence);

    if let Some(condition) = &approval.rollback_condition {
        record = record.with_rollback_condition(condition.clone());
    }
    record
}
