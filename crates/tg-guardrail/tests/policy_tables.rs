//! Behaviour of the canonical rule tables through the public engine API.
//!
//! Covers the documented verdict for every canonical source/target pair,
//! determinism across repeated calls, the strict/lenient split on reversed
//! edges, and default-allow for pairs no rule names.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tg_guardrail::{
    EdgeProposal, GuardrailEngine, RuleTable, FALLBACK_RULE_ID, REVERSED_REQUIREMENT_REASON,
};
use tg_model::{NodeType, Verdict};
use NodeType::{Feature, Requirement, Test};

fn node_type() -> impl Strategy<Value = NodeType> {
    prop_oneof![Just(Requirement), Just(Feature), Just(Test)]
}

#[test]
fn canonical_pairs_have_documented_verdicts() {
    let engine = GuardrailEngine::new(RuleTable::strict());
    let expected = [
        (Requirement, Feature, Verdict::Allowed, "R001"),
        (Test, Feature, Verdict::Allowed, "R002"),
        (Test, Requirement, Verdict::Allowed, "R003"),
        (Requirement, Test, Verdict::Warning, "R004"),
        (Feature, Requirement, Verdict::Forbidden, "R005"),
        (Feature, Test, Verdict::Forbidden, "R006"),
    ];

    for (source, target, verdict, rule_id) in expected {
        let eval = engine.evaluate_edge(source, target, "src", "tgt");
        assert_eq!((eval.verdict, eval.rule_id()), (verdict, rule_id), "{source} → {target}");
    }
}

#[test]
fn lenient_table_downgrades_reversed_edges() {
    let engine = GuardrailEngine::new(RuleTable::lenient());
    let proposal = EdgeProposal::new(Feature, "Feature-001", Requirement, "BR-002")
        .with_ids("feat-001", "req-002");

    let eval = engine.evaluate(&proposal);
    assert_eq!(eval.verdict, Verdict::Warning);
    assert_eq!(eval.rule_id(), "R005");
    assert_eq!(eval.approver_count(), 1);
    assert!(eval.reason_required);
    assert!(eval.can_normalize());

    let n = eval.normalization.unwrap();
    assert_eq!(n.normalized_source, "req-002");
    assert_eq!(n.normalized_target, "feat-001");
    assert_eq!(n.reason, REVERSED_REQUIREMENT_REASON);
}

#[test]
fn strict_table_forbids_reversed_edges() {
    let engine = GuardrailEngine::default();
    let proposal = EdgeProposal::new(Feature, "Feature-001", Requirement, "BR-002")
        .with_ids("feat-001", "req-002");

    let eval = engine.evaluate(&proposal);
    assert_eq!(eval.verdict, Verdict::Forbidden);
    assert_eq!(eval.approver_count(), 2);
    assert!(eval.power_mode_only());
    assert!(!eval.can_normalize());
    assert!(eval.message.contains("Feature-001"));
    assert!(eval.message.contains("BR-002"));
}

#[test]
fn swapping_tables_needs_no_other_change() {
    let proposal = EdgeProposal::new(Feature, "F", Test, "T");
    let strict = GuardrailEngine::new(RuleTable::strict()).evaluate(&proposal);
    let lenient = GuardrailEngine::new(RuleTable::lenient()).evaluate(&proposal);
    assert_eq!(strict.rule_id(), lenient.rule_id());
    assert_eq!(strict.verdict, Verdict::Forbidden);
    assert_eq!(lenient.verdict, Verdict::Warning);
}

#[test]
fn normalized_edge_is_allowed() {
    let engine = GuardrailEngine::new(RuleTable::lenient());
    for (source, target) in [(Feature, Requirement), (Feature, Test)] {
        let proposal = EdgeProposal::new(source, "a", target, "b");
        let swapped = engine.evaluate(&proposal.reversed());
        assert_eq!(swapped.verdict, Verdict::Allowed);
    }
}

#[test]
fn evaluation_serializes_with_wire_names() {
    let engine = GuardrailEngine::new(RuleTable::lenient());
    let eval = engine.evaluate_edge(Feature, Test, "F-1", "TC-1");
    let json = serde_json::to_value(&eval).unwrap();
    assert_eq!(json["verdict"], "warning");
    assert_eq!(json["matchedRule"]["ruleId"], "R006");
    assert_eq!(json["approvalRequired"], true);
    assert_eq!(json["normalization"]["canNormalize"], true);
}

proptest! {
    #[test]
    fn prop_evaluation_is_deterministic(
        source in node_type(),
        target in node_type(),
        source_label in "[A-Za-z0-9-]{1,12}",
        target_label in "[A-Za-z0-9-]{1,12}",
    ) {
        let engine = GuardrailEngine::default();
        let first = engine.evaluate_edge(source, target, &source_label, &target_label);
        let second = engine.evaluate_edge(source, target, &source_label, &target_label);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.approval_required);
        prop_assert!(first.message.contains(&source_label));
        prop_assert!(first.message.contains(&target_label));
    }

    #[test]
    fn prop_same_type_pairs_fall_back(ty in node_type()) {
        let engine = GuardrailEngine::new(RuleTable::lenient());
        let eval = engine.evaluate_edge(ty, ty, "a", "b");
        prop_assert_eq!(eval.rule_id(), FALLBACK_RULE_ID);
        prop_assert_eq!(eval.verdict, Verdict::Allowed);
        prop_assert_eq!(eval.approver_count(), 1);
        prop_assert!(!eval.reason_required);
    }
}
