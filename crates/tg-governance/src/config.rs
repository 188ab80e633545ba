//! Governance configuration
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration:
//!
//! ```toml
//! project_name = "checkout"
//! table = "lenient"           # strict | lenient
//! fallback = "warn"           # allow | warn | forbid
//! min_rationale_chars = 10
//! require_purpose_alignment = true
//! signer_fingerprint = "SHA256:team-key"
//! ```
//!
//! An inline `[[rules]]` list replaces the canonical table entirely. Rule
//! entries use the camelCase keys of the rule wire format (`ruleId`,
//! `approvalRequirement`, ...), so a table exported as JSON reads back
//! unchanged. Unknown keys are rejected at both levels.

use crate::error::GovernanceError;
use serde::{Deserialize, Serialize};
use tg_guardrail::{FallbackPolicy, GuardrailEngine, RuleTable, TableVariant};

/// Default minimum rationale length, in characters after trimming
pub const DEFAULT_MIN_RATIONALE_CHARS: usize = 10;

/// Fingerprint recorded when none is configured
pub const DEFAULT_SIGNER_FINGERPRINT: &str = "unverified";

/// Governance configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GovernanceConfig {
    /// Project name written into exports
    pub project_name: String,
    /// Canonical rule table variant
    pub table: TableVariant,
    /// Custom rules; overrides `table` when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleTable>,
    /// Outcome for pairs no rule names
    pub fallback: FallbackPolicy,
    /// Minimum trimmed rationale length
    pub min_rationale_chars: usize,
    /// Approvers must confirm the change serves the purpose
    pub require_purpose_alignment: bool,
    /// Key fingerprint attached to ledger attribution blocks
    pub signer_fingerprint: String,
}

impl GovernanceConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With project name
    #[must_use]
    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    /// With canonical table variant
    #[inline]
    #[must_use]
    pub fn with_table(mut self, table: TableVariant) -> Self {
        self.table = table;
        self
    }

    /// With custom rule table
    #[must_use]
    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = Some(rules);
        self
    }

    /// With fallback policy
    #[inline]
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// With minimum rationale length
    #[inline]
    #[must_use]
    pub fn with_min_rationale_chars(mut self, chars: usize) -> Self {
        self.min_rationale_chars = chars;
        self
    }

    /// With purpose alignment requirement
    #[inline]
    #[must_use]
    pub fn with_purpose_alignment(mut self, required: bool) -> Self {
        self.require_purpose_alignment = required;
        self
    }

    /// With signer fingerprint
    #[must_use]
    pub fn with_signer_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.signer_fingerprint = fingerprint.into();
        self
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    /// Returns [`GovernanceError::Config`] on malformed TOML, an invalid
    /// custom rule table, or a blank signer fingerprint.
    pub fn from_toml_str(source: &str) -> Result<Self, GovernanceError> {
        let config: Self = toml::from_str(source).map_err(|e| GovernanceError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    /// Returns [`GovernanceError::Config`] describing the first problem.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.signer_fingerprint.trim().is_empty() {
            return Err(GovernanceError::config("signer_fingerprint must not be blank"));
        }
        if self.rules.as_ref().is_some_and(RuleTable::is_empty) {
            return Err(GovernanceError::config("custom rule table is empty"));
        }
        Ok(())
    }

    /// Rule table in effect
    #[must_use]
    pub fn rule_table(&self) -> RuleTable {
        self.rules.clone().unwrap_or_else(|| self.table.table())
    }

    /// Engine for this configuration
    #[must_use]
    pub fn build_engine(&self) -> GuardrailEngine {
        GuardrailEngine::new(self.rule_table()).with_fallback_policy(self.fallback)
    }
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            project_name: "tracegate".to_string(),
            table: TableVariant::Strict,
            rules: None,
            fallback: FallbackPolicy::Allow,
            min_rationale_chars: DEFAULT_MIN_RATIONALE_CHARS,
            require_purpose_alignment: true,
            signer_fingerprint: DEFAULT_SIGNER_FINGERPRINT.to_string(),
        }
    }
}
