//! Error types for the guardrail engine
//!
//! Evaluation itself is total; these errors only arise at the boundaries:
//! building a rule table and parsing untyped node types.

use tg_model::ModelError;

/// Guardrail errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuardrailError {
    /// Malformed rule, rule table or node type
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl GuardrailError {
    /// Create invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<ModelError> for GuardrailError {
    fn from(err: ModelError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
