//! Hash chain construction and verification
//!
//! `hash = SHA-256(prevHash || canonicalize(record))`, with `prevHash`
//! rendered as the genesis sentinel `"0"` or the previous entry's hex hash.
//! Putting `prevHash` first binds every hash to its chain position.
//!
//! Verification never fails: whatever is wrong with the input is reported
//! as [`ChainViolation`] data, since the input may itself be compromised.

use crate::canonical::canonicalize;
use crate::entry::{DecisionLedgerEntry, DecisionRecord, Signature};
use crate::error::LedgerError;
use crate::hash::{ChainLink, LedgerHash, StoredHash};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash of an entry body at a given chain position
///
/// # Errors
/// Returns [`LedgerError::Serialization`] if the record cannot be encoded.
pub fn compute_entry_hash(record: &DecisionRecord, prev: &ChainLink) -> Result<LedgerHash, LedgerError> {
    let canonical = canonicalize(record)?;
    let mut payload = prev.to_string();
    payload.push_str(&canonical);
    Ok(LedgerHash::compute(payload.as_bytes()))
}

/// Chain a record after `prev`
///
/// The attribution block names the record's approver as signer.
///
/// # Errors
/// Returns [`LedgerError::InvalidArgument`] if a required field is blank, a
/// confidence value is out of range or `prev` is malformed.
pub fn create_entry(
    record: DecisionRecord,
    prev: ChainLink,
    signer_fingerprint: &str,
) -> Result<DecisionLedgerEntry, LedgerError> {
    record.validate().map_err(LedgerError::InvalidArgument)?;
    if signer_fingerprint.trim().is_empty() {
        return Err(LedgerError::invalid_argument("missing signer fingerprint"));
    }
    if prev.is_malformed() {
        return Err(LedgerError::invalid_argument(format!("malformed prevHash: {prev}")));
    }

    let hash = compute_entry_hash(&record, &prev)?;
    let signature = Signature {
        signer_id: record.approver.clone(),
        public_key_fingerprint: signer_fingerprint.to_string(),
        timestamp: Utc::now(),
    };

    Ok(DecisionLedgerEntry {
        record,
        prev_hash: prev,
        hash: StoredHash::Digest(hash),
        signature,
    })
}

/// What is wrong at a violating index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    /// First entry does not carry the genesis sentinel
    #[error("first entry's prevHash is {found}, expected the genesis sentinel")]
    GenesisLink { found: ChainLink },

    /// `prevHash` differs from the previous entry's stored hash
    #[error("prevHash {found} does not match the previous entry's hash {expected}")]
    LinkMismatch { expected: ChainLink, found: ChainLink },

    /// Stored hash is not a SHA-256 digest at all
    #[error("stored hash {found:?} is not a SHA-256 digest")]
    MalformedHash { found: String },

    /// Stored hash differs from the recomputed one
    #[error("stored hash {stored} does not match recomputed hash {computed}; content was altered")]
    HashMismatch { stored: LedgerHash, computed: LedgerHash },

    /// Content could not be canonicalized
    #[error("entry content cannot be canonicalized: {reason}")]
    Unhashable { reason: String },
}

/// An integrity failure at one chain position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainViolation {
    pub index: usize,
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for ChainViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry {}: {}", self.index, self.kind)
    }
}

/// Result of verifying a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainVerification {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broken_at: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChainVerification {
    /// Verification of an intact chain
    #[must_use]
    pub const fn intact() -> Self {
        Self {
            valid: true,
            broken_at: None,
            error: None,
        }
    }

    /// Verification reporting a violation
    #[must_use]
    pub fn broken(violation: &ChainViolation) -> Self {
        Self {
            valid: false,
            broken_at: Some(violation.index),
            error: Some(violation.to_string()),
        }
    }
}

/// Check every entry against its predecessor's stored hash
///
/// Each position is judged independently, so a second, unrelated failure
/// further down is still reported. At most one violation per index: a
/// broken link takes precedence over a content mismatch.
#[must_use]
pub fn scan_chain(entries: &[DecisionLedgerEntry]) -> Vec<ChainViolation> {
    let mut violations = Vec::new();
    let mut expected_prev = ChainLink::Genesis;

    for (index, entry) in entries.iter().enumerate() {
        if let Some(kind) = check_entry(entry, &expected_prev, index) {
            violations.push(ChainViolation { index, kind });
        }
        expected_prev = entry.link();
    }

    violations
}

/// Verify a chain, reporting the first violation
///
/// An empty chain is valid.
#[must_use]
pub fn verify_chain(entries: &[DecisionLedgerEntry]) -> ChainVerification {
    match first_violation(entries) {
        None => ChainVerification::intact(),
        Some(violation) => {
            tracing::warn!(index = violation.index, "ledger chain broken: {}", violation.kind);
            ChainVerification::broken(&violation)
        }
    }
}

pub(crate) fn first_violation(entries: &[DecisionLedgerEntry]) -> Option<ChainViolation> {
    let mut expected_prev = ChainLink::Genesis;
    for (index, entry) in entries.iter().enumerate() {
        if let Some(kind) = check_entry(entry, &expected_prev, index) {
            return Some(ChainViolation { index, kind });
        }
        expected_prev = entry.link();
    }
    None
}

fn check_entry(entry: &DecisionLedgerEntry, expected_prev: &ChainLink, index: usize) -> Option<ViolationKind> {
    if entry.prev_hash != *expected_prev {
        let found = entry.prev_hash.clone();
        return Some(if index == 0 {
            ViolationKind::GenesisLink { found }
        } else {
            ViolationKind::LinkMismatch {
                expected: expected_prev.clone(),
                found,
            }
        });
    }

    let stored = match &entry.hash {
        StoredHash::Digest(hash) => *hash,
        StoredHash::Malformed(text) => return Some(ViolationKind::MalformedHash { found: text.clone() }),
    };

    match compute_entry_hash(&entry.record, expected_prev) {
        Ok(computed) if computed == stored => None,
        Ok(computed) => Some(ViolationKind::HashMismatch { stored, computed }),
        Err(err) => Some(ViolationKind::Unhashable {
            reason: err.to_string(),
        }),
    }
}
