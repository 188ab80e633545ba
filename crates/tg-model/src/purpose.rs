//! Editing purpose and mode
//!
//! Every approved change is tied to the purpose in force when it was made.

use serde::{Deserialize, Serialize};

/// Editing mode
///
/// Forbidden connections can only be approved in [`EditMode::Power`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    #[default]
    Safe,
    Power,
}

/// The governing goal of an editing session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purpose {
    /// What the change is for, e.g. "cut cart abandonment by 15%"
    pub goal: String,
    /// Area of the graph the change touches, e.g. "authentication"
    pub scope: String,
    #[serde(default)]
    pub mode: EditMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_criteria: Option<String>,
}

impl Purpose {
    /// Create a purpose in safe mode
    #[must_use]
    pub fn new(goal: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            scope: scope.into(),
            mode: EditMode::Safe,
            success_criteria: None,
        }
    }

    /// With edit mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: EditMode) -> Self {
        self.mode = mode;
        self
    }

    /// With success criteria
    #[must_use]
    pub fn with_success_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.success_criteria = Some(criteria.into());
        self
    }

    /// Goal and scope are both non-blank
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.goal.trim().is_empty() && !self.scope.trim().is_empty()
    }

    /// Power mode is active
    #[inline]
    #[must_use]
    pub fn is_power_mode(&self) -> bool {
        self.mode == EditMode::Power
    }

    /// One-line summary recorded in ledger entries
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} (scope: {})", self.goal.trim(), self.scope.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_purpose_is_not_set() {
        assert!(!Purpose::default().is_set());
        assert!(!Purpose::new("reduce churn", "   ").is_set());
        assert!(Purpose::new("reduce churn", "auth").is_set());
    }

    #[test]
    fn mode_defaults_to_safe() {
        let purpose = Purpose::new("g", "s");
        assert!(!purpose.is_power_mode());
        assert!(purpose.with_mode(EditMode::Power).is_power_mode());
    }

    #[test]
    fn summary_trims_fields() {
        let purpose = Purpose::new("  reduce churn ", " auth ");
        assert_eq!(purpose.summary(), "reduce churn (scope: auth)");
    }
}
