//! Ledger entry types
//!
//! A [`DecisionRecord`] is the human-approved content of a decision. Once
//! chained it becomes a [`DecisionLedgerEntry`]: the record plus `prevHash`,
//! `hash` and an attribution [`Signature`]. Entries expose no mutators.

use crate::hash::{ChainLink, StoredHash};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tg_model::Verdict;

/// Kind of graph mutation in an alternative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    AddEdge,
    DeleteEdge,
    AddNode,
    UpdateNode,
}

/// One graph mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub op: ChangeOp,
    pub data: serde_json::Value,
}

/// Coverage impact of an alternative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageDelta {
    pub requirements_covered: i64,
    pub tests_missing: i64,
}

/// Why an alternative was proposed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeRationale {
    pub rules_matched: Vec<String>,
    pub evidence: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub risk_notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_delta: Option<CoverageDelta>,
    /// 0.0 – 1.0
    pub confidence: f64,
}

/// An option considered before the decision was taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub id: String,
    pub label: String,
    pub changes: Vec<Change>,
    pub rationale: AlternativeRationale,
    pub guardrail: Verdict,
}

/// Human-approved decision content
///
/// Everything in here is covered by the entry hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub commit_id: String,
    pub timestamp: DateTime<Utc>,
    /// Governing goal at decision time
    pub purpose: String,
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<Alternative>,
    pub selected_option: String,
    pub rationale: String,
    pub approver: String,
    pub impact_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollback_condition: Option<String>,
    /// 0.0 – 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules_matched: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,
}

impl DecisionRecord {
    /// Create a record with a fresh commit id, stamped now
    #[must_use]
    pub fn new(
        purpose: impl Into<String>,
        action_type: impl Into<String>,
        selected_option: impl Into<String>,
        rationale: impl Into<String>,
        approver: impl Into<String>,
        impact_summary: impl Into<String>,
    ) -> Self {
        Self {
            commit_id: new_commit_id(),
            timestamp: Utc::now(),
            purpose: purpose.into(),
            action_type: action_type.into(),
            alternatives: Vec::new(),
            selected_option: selected_option.into(),
            rationale: rationale.into(),
            approver: approver.into(),
            impact_summary: impact_summary.into(),
            rollback_condition: None,
            confidence: None,
            rules_matched: Vec::new(),
            evidence: Vec::new(),
        }
    }

    /// With explicit commit id
    #[must_use]
    pub fn with_commit_id(mut self, commit_id: impl Into<String>) -> Self {
        self.commit_id = commit_id.into();
        self
    }

    /// With explicit timestamp
    #[inline]
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// With rollback condition
    #[must_use]
    pub fn with_rollback_condition(mut self, condition: impl Into<String>) -> Self {
        self.rollback_condition = Some(condition.into());
        self
    }

    /// With confidence
    #[inline]
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// With matched rule ids
    #[must_use]
    pub fn with_rules_matched<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules_matched = rules.into_iter().map(Into::into).collect();
        self
    }

    /// With evidence references
    #[must_use]
    pub fn with_evidence<I, S>(mut self, evidence: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evidence = evidence.into_iter().map(Into::into).collect();
        self
    }

    /// With considered alternatives
    #[must_use]
    pub fn with_alternatives(mut self, alternatives: Vec<Alternative>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Check required fields and value ranges
    ///
    /// # Errors
    /// Returns the first problem found as an invalid-argument message.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("commitId", &self.commit_id),
            ("purpose", &self.purpose),
            ("actionType", &self.action_type),
            ("selectedOption", &self.selected_option),
            ("rationale", &self.rationale),
            ("approver", &self.approver),
            ("impactSummary", &self.impact_summary),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(format!("missing required field: {name}"));
        }
        if let Some(c) = self.confidence {
            check_confidence("confidence", c)?;
        }
        for alt in &self.alternatives {
            check_confidence(&format!("alternatives[{}].rationale.confidence", alt.id), alt.rationale.confidence)?;
        }
        Ok(())
    }
}

fn check_confidence(field: &str, value: f64) -> Result<(), String> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{field} must be within 0.0..=1.0, got {value}"))
    }
}

/// Fresh unique commit id
#[must_use]
pub fn new_commit_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Attribution block
///
/// Names who committed an entry and the fingerprint of the key they claim.
/// Not a cryptographic signature, and not covered by the entry hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub signer_id: String,
    pub public_key_fingerprint: String,
    pub timestamp: DateTime<Utc>,
}

/// A committed, hash-linked ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionLedgerEntry {
    #[serde(flatten)]
    pub(crate) record: DecisionRecord,
    pub(crate) prev_hash: ChainLink,
    pub(crate) hash: StoredHash,
    pub(crate) signature: Signature,
}

impl DecisionLedgerEntry {
    /// The hashed decision content
    #[inline]
    #[must_use]
    pub fn record(&self) -> &DecisionRecord {
        &self.record
    }

    /// Link to the preceding entry
    #[inline]
    #[must_use]
    pub fn prev_hash(&self) -> &ChainLink {
        &self.prev_hash
    }

    /// Hash of this entry
    #[inline]
    #[must_use]
    pub fn hash(&self) -> &StoredHash {
        &self.hash
    }

    /// The `prevHash` the next entry must carry
    #[inline]
    #[must_use]
    pub fn link(&self) -> ChainLink {
        self.hash.link()
    }

    /// Attribution block
    #[inline]
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Commit id of the record
    #[inline]
    #[must_use]
    pub fn commit_id(&self) -> &str {
        &self.record.commit_id
    }
}
