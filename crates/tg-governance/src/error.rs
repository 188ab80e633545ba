//! Error types for Tracegate governance
//!
//! Aggregates the guardrail and ledger errors plus:
//! - Denied approvals, with every failed check
//! - Evaluations that no longer match their proposal
//! - Configuration problems

use crate::approval::ApprovalError;
use tg_guardrail::GuardrailError;
use tg_ledger::LedgerError;

/// Governance error type
#[derive(Debug, thiserror::Error)]
pub enum GovernanceError {
    /// Guardrail input or table problem
    #[error("guardrail error: {0}")]
    Guardrail(#[from] GuardrailError),

    /// Ledger append, export or import failed
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Approval checks failed
    #[error(transparent)]
    ApprovalDenied(#[from] ApprovalError),

    /// Supplied evaluation is not what the engine returns for the proposal
    #[error("evaluation for {source_label} → {target_label} does not match the current rule table (got {supplied}, engine says {current})")]
    EvaluationMismatch {
        source_label: String,
        target_label: String,
        supplied: String,
        current: String,
    },

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl GovernanceError {
    /// Create configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Retrying may succeed (stale ledger tip)
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Ledger(err) => err.is_retryable(),
            _ => false,
        }
    }
}
