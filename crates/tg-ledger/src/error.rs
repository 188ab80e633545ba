//! Error types for the decision ledger
//!
//! Integrity violations found while verifying a chain are reported as
//! [`ChainViolation`] data by the verification functions; they only become an
//! error when a caller tries to build a ledger on top of a broken chain.

use crate::chain::ChainViolation;
use crate::hash::ChainLink;

/// Ledger errors
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Malformed entry input (missing required field, confidence out of range)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Append raced with another append: the supplied tip is stale
    #[error("chain conflict: expected tip {expected}, current tip is {actual}")]
    ChainConflict {
        /// Tip the caller built the entry against
        expected: ChainLink,
        /// Actual tip of the chain
        actual: ChainLink,
    },

    /// Refused to adopt a chain that fails verification
    #[error("chain integrity violation: {0}")]
    IntegrityViolation(ChainViolation),

    /// Export carries a major version this build does not understand
    #[error("unsupported export version {found} (supported major version: {supported})")]
    UnsupportedVersion {
        /// Version string found in the document
        found: String,
        /// Major version this build reads
        supported: u32,
    },

    /// JSON encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LedgerError {
    /// Create invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Retrying against the current tip may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ChainConflict { .. })
    }
}
