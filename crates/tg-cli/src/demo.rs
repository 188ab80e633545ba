//! `tracegate demo`
//!
//! Records three decisions on one ledger and returns the signed export:
//! an allowed requirement → feature edge, the reversed edge approved under
//! the lenient table, and the reversed edge approved again under the strict
//! table with two approvers in power mode.

use anyhow::Result;
use std::sync::Arc;
use tg_governance::{ApprovalGate, ApprovalRequest, DecisionPipeline, GovernanceConfig, RationaleType};
use tg_guardrail::{EdgeProposal, GuardrailEngine, TableVariant};
use tg_ledger::{ExportMetadata, SharedLedger};
use tg_model::{EditMode, NodeType, Purpose};

/// Run the scenario and export the resulting ledger
///
/// # Errors
/// Fails if any step is refused; with the built-in tables none is.
pub fn run_demo(config: &GovernanceConfig) -> Result<String> {
    let ledger = SharedLedger::new();
    let gate = ApprovalGate::from_config(config);
    let pipeline_for = |variant: TableVariant| {
        let engine = GuardrailEngine::new(variant.table()).with_fallback_policy(config.fallback);
        DecisionPipeline::new(Arc::new(engine), gate, ledger.clone(), config.signer_fingerprint.clone())
    };
    let strict = pipeline_for(TableVariant::Strict);
    let lenient = pipeline_for(TableVariant::Lenient);

    let purpose = Purpose::new("reduce checkout abandonment by 15%", "checkout");
    let forward = EdgeProposal::new(NodeType::Requirement, "BR-002", NodeType::Feature, "Feature-001")
        .with_ids("req-002", "feat-001");
    let reversed = forward.reversed();

    let eval = strict.propose(&forward);
    strict.approve_at_tip(
        &forward,
        &eval,
        &ApprovalRequest::new(purpose.clone(), "alice", "Feature-001 delivers saved cards at payment")
            .with_references(["ISO/IEC/IEEE 29148:2018"])
            .aligned(),
    )?;

    let eval = lenient.propose(&reversed);
    lenient.approve_at_tip(
        &reversed,
        &eval,
        &ApprovalRequest::new(purpose.clone(), "bob", "imported legacy link kept until migration")
            .with_rationale_type(RationaleType::SchedulePriority)
            .with_rollback_condition("legacy importer retired")
            .aligned(),
    )?;

    let eval = strict.propose(&reversed);
    strict.approve_at_tip(
        &reversed,
        &eval,
        &ApprovalRequest::new(
            purpose.with_mode(EditMode::Power),
            "carol",
            "auditor requires the reversed link for the release record",
        )
        .with_approver("dave")
        .with_rationale_type(RationaleType::Other)
        .aligned(),
    )?;

    tracing::info!(entries = ledger.len(), "demo scenario recorded");
    Ok(ledger.export(ExportMetadata::new(config.project_name.clone(), "tracegate demo"))?)
}
