//! User-facing explanation text
//!
//! Templates are keyed on (verdict, source type, target type). Every message
//! names both endpoint labels verbatim.

use crate::rule::{ApprovalRequirement, GuardrailRule};
use tg_model::{NodeType, Verdict};

pub(crate) fn render(
    verdict: Verdict,
    source: NodeType,
    target: NodeType,
    source_label: &str,
    target_label: &str,
    rule: &GuardrailRule,
) -> String {
    use NodeType::{Feature, Requirement, Test};

    match (verdict, source, target) {
        (Verdict::Allowed, Requirement, Feature) => format!(
            "Allowed: requirement \"{source_label}\" is implemented by feature \"{target_label}\". Traceability established."
        ),
        (Verdict::Allowed, Test, Feature) => format!(
            "Allowed: test \"{source_label}\" verifies feature \"{target_label}\". Quality assurance strengthened."
        ),
        (Verdict::Allowed, Test, Requirement) => format!(
            "Allowed: test \"{source_label}\" verifies requirement \"{target_label}\". Acceptance criteria made explicit."
        ),
        (Verdict::Allowed, _, _) => {
            format!("Allowed: new connection \"{source_label}\" → \"{target_label}\".")
        }

        (Verdict::Warning, Requirement, Test) => format!(
            "Warning: test → requirement is the usual direction, but a reference from requirement \"{source_label}\" to test \"{target_label}\" is also valid. Record the reason for approval."
        ),
        (Verdict::Warning, Feature, Requirement) => format!(
            "Warning: feature \"{source_label}\" → requirement \"{target_label}\" runs against the usual requirement → feature direction. {}",
            approval_phrase(&rule.approval_requirement)
        ),
        (Verdict::Warning, Feature, Test) => format!(
            "Warning: feature \"{source_label}\" → test \"{target_label}\" runs against the usual test → feature direction. {}",
            approval_phrase(&rule.approval_requirement)
        ),
        (Verdict::Warning, _, _) => format!(
            "Warning: \"{source_label}\" → \"{target_label}\". {}",
            or_default(&rule.rationale, "Record the reason for approval.")
        ),

        (Verdict::Forbidden, Feature, Requirement) => format!(
            "Forbidden: feature \"{source_label}\" → requirement \"{target_label}\" reverses traceability; the usual direction is requirement → feature. {}",
            approval_phrase(&rule.approval_requirement)
        ),
        (Verdict::Forbidden, Feature, Test) => format!(
            "Forbidden: feature \"{source_label}\" → test \"{target_label}\" makes the test depend on the feature, which is discouraged. {}",
            approval_phrase(&rule.approval_requirement)
        ),
        (Verdict::Forbidden, _, _) => format!(
            "Forbidden: \"{source_label}\" → \"{target_label}\". {}",
            or_default(&rule.rationale, "Power mode is required.")
        ),
    }
}

fn approval_phrase(req: &ApprovalRequirement) -> String {
    let approvers = if req.approver_count == 1 {
        "1 approver".to_string()
    } else {
        format!("{} approvers", req.approver_count)
    };
    let mode = if req.power_mode_only { " in power mode" } else { "" };
    let reason = if req.reason_required { " with a recorded reason" } else { "" };
    format!("Requires approval by {approvers}{mode}{reason}.")
}

fn or_default<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.trim().is_empty() {
        fallback
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::RuleTable;

    #[test]
    fn every_template_names_both_labels() {
        let strict = RuleTable::strict();
        let lenient = RuleTable::lenient();
        let fallback = crate::rule::FallbackPolicy::Warn.rule();
        for table in [&strict, &lenient] {
            for source in NodeType::ALL {
                for target in NodeType::ALL {
                    let rule = table.find(source, target).unwrap_or(&fallback);
                    for verdict in [Verdict::Allowed, Verdict::Warning, Verdict::Forbidden] {
                        let msg = render(verdict, source, target, "SRC-LABEL", "TGT-LABEL", rule);
                        assert!(msg.contains("SRC-LABEL"), "{msg}");
                        assert!(msg.contains("TGT-LABEL"), "{msg}");
                    }
                }
            }
        }
    }

    #[test]
    fn approval_phrase_reflects_requirement() {
        assert_eq!(
            approval_phrase(&ApprovalRequirement::elevated()),
            "Requires approval by 2 approvers in power mode with a recorded reason."
        );
        assert_eq!(approval_phrase(&ApprovalRequirement::single()), "Requires approval by 1 approver.");
    }

    #[test]
    fn generic_warning_uses_rationale() {
        let mut rule = crate::rule::FallbackPolicy::Warn.rule();
        rule.rationale = "Check with the architect".to_string();
        let msg = render(Verdict::Warning, NodeType::Test, NodeType::Test, "a", "b", &rule);
        assert!(msg.ends_with("Check with the architect"));

        rule.rationale = "  ".to_string();
        let msg = render(Verdict::Warning, NodeType::Test, NodeType::Test, "a", "b", &rule);
        assert!(msg.ends_with("Record the reason for approval."));
    }
}
