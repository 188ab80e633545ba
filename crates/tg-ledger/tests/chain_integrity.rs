//! Tamper detection through the export boundary.
//!
//! Entries expose no mutators, so every attack here edits the exported JSON
//! and re-imports it, the way a tampered file would arrive.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use tg_ledger::{
    canonical_json, import_export, Alternative, AlternativeRationale, Change, ChangeOp,
    CoverageDelta, DecisionLedger, DecisionRecord, ExportMetadata, ViolationKind,
};
use tg_model::Verdict;

fn full_record(n: usize) -> DecisionRecord {
    scored_record(n, 0.8, 0.9)
}

fn scored_record(n: usize, confidence: f64, alternative_confidence: f64) -> DecisionRecord {
    let alternative = Alternative {
        id: format!("alt-{n:03}"),
        label: "recommended".to_string(),
        changes: vec![Change {
            op: ChangeOp::AddEdge,
            data: json!({"source": "req-001", "target": format!("feat-{n:03}"), "type": "implements"}),
        }],
        rationale: AlternativeRationale {
            rules_matched: vec!["R001".to_string()],
            evidence: vec!["ISO/IEC/IEEE 29148".to_string()],
            risk_notes: vec!["none".to_string()],
            coverage_delta: Some(CoverageDelta {
                requirements_covered: 1,
                tests_missing: 0,
            }),
            confidence: alternative_confidence,
        },
        guardrail: Verdict::Allowed,
    };

    DecisionRecord::new(
        "trace checkout requirements",
        "add_edge",
        format!("option {n}"),
        "feature delivers the business rule",
        "alice",
        "allowed implements edge",
    )
    .with_rollback_condition("feature descoped")
    .with_confidence(confidence)
    .with_rules_matched(["R001"])
    .with_evidence(["ISO/IEC/IEEE 29148"])
    .with_alternatives(vec![alternative])
}

fn exported(len: usize) -> Value {
    let mut ledger = DecisionLedger::new();
    for n in 0..len {
        let tip = ledger.tip();
        ledger.append(full_record(n), &tip, "fp:alice").unwrap();
    }
    let json = ledger.export(ExportMetadata::new("checkout", "alice")).unwrap();
    serde_json::from_str(&json).unwrap()
}

fn broken_at(doc: &Value) -> Option<usize> {
    import_export(&doc.to_string()).unwrap().verify().broken_at
}

/// Every hashed field, paired with a replacement value
fn hashed_field_edits() -> Vec<(&'static str, Value)> {
    vec![
        ("commitId", json!("forged-commit")),
        ("timestamp", json!("2020-01-01T00:00:00Z")),
        ("purpose", json!("a different purpose")),
        ("actionType", json!("delete_edge")),
        ("selectedOption", json!("another option")),
        ("rationale", json!("rewritten rationale")),
        ("approver", json!("mallory")),
        ("impactSummary", json!("no impact")),
        ("rollbackCondition", json!("never")),
        ("confidence", json!(0.81)),
        ("rulesMatched", json!(["R005"])),
        ("evidence", json!([])),
    ]
}

#[test]
fn untouched_export_verifies_repeatedly() {
    let doc = exported(4);
    let imported = import_export(&doc.to_string()).unwrap();
    assert!(imported.chain_valid);
    for _ in 0..3 {
        assert!(imported.verify().valid);
    }
}

#[test]
fn every_hashed_field_is_tamper_evident() {
    for (field, replacement) in hashed_field_edits() {
        let mut doc = exported(3);
        doc["entries"][1][field] = replacement;
        assert_eq!(broken_at(&doc), Some(1), "tampering {field}");
    }
}

#[test]
fn alternatives_are_tamper_evident() {
    let mut doc = exported(2);
    doc["entries"][0]["alternatives"][0]["guardrail"] = json!("forbidden");
    assert_eq!(broken_at(&doc), Some(0));

    let mut doc = exported(2);
    doc["entries"][1]["alternatives"][0]["rationale"]["confidence"] = json!(0.1);
    assert_eq!(broken_at(&doc), Some(1));
}

#[test]
fn signature_is_not_hashed() {
    let mut doc = exported(2);
    doc["entries"][1]["signature"]["signerId"] = json!("mallory");
    assert_eq!(broken_at(&doc), None);
}

#[test]
fn replaced_prev_hash_is_detected() {
    let mut doc = exported(3);
    doc["entries"][2]["prevHash"] = doc["entries"][0]["hash"].clone();
    let imported = import_export(&doc.to_string()).unwrap();
    let result = imported.verify();
    assert_eq!(result.broken_at, Some(2));

    let violations = tg_ledger::scan_chain(&imported.entries);
    assert!(matches!(violations[0].kind, ViolationKind::LinkMismatch { .. }));
}

#[test]
fn malformed_prev_hash_is_located() {
    let mut doc = exported(3);
    doc["entries"][2]["prevHash"] = json!("tampered");
    let imported = import_export(&doc.to_string()).unwrap();
    assert_eq!(imported.verify().broken_at, Some(2));

    let mut doc = exported(3);
    doc["entries"][0]["prevHash"] = json!("tampered");
    let violations = tg_ledger::scan_chain(&import_export(&doc.to_string()).unwrap().entries);
    assert_eq!(violations.len(), 1);
    assert!(matches!(violations[0].kind, ViolationKind::GenesisLink { .. }));
}

#[test]
fn malformed_stored_hash_is_located() {
    let mut doc = exported(3);
    doc["entries"][1]["hash"] = json!("abc");
    let imported = import_export(&doc.to_string()).unwrap();
    let violations = tg_ledger::scan_chain(&imported.entries);
    let indices: Vec<_> = violations.iter().map(|v| v.index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert_eq!(violations[0].kind, ViolationKind::MalformedHash { found: "abc".to_string() });
    assert!(DecisionLedger::from_entries(imported.entries).is_err());
}

#[test]
fn removed_entry_is_detected() {
    let mut doc = exported(3);
    doc["entries"].as_array_mut().unwrap().remove(1);
    assert_eq!(broken_at(&doc), Some(1));
}

#[test]
fn reordered_entries_are_detected() {
    let mut doc = exported(3);
    doc["entries"].as_array_mut().unwrap().swap(0, 1);
    assert_eq!(broken_at(&doc), Some(0));
}

#[test]
fn recomputed_stored_hash_still_breaks_successor() {
    let mut doc = exported(3);
    doc["entries"][0]["rationale"] = json!("rewritten");
    let imported = import_export(&doc.to_string()).unwrap();
    let rehashed = tg_ledger::compute_entry_hash(imported.entries[0].record(), imported.entries[0].prev_hash()).unwrap();
    doc["entries"][0]["hash"] = json!(rehashed.to_string());
    assert_eq!(broken_at(&doc), Some(1));
}

#[test]
fn adopted_chain_keeps_appending() {
    let doc = exported(2);
    let imported = import_export(&doc.to_string()).unwrap();
    let mut ledger = DecisionLedger::from_entries(imported.entries).unwrap();
    let tip = ledger.tip();
    ledger.append(full_record(2), &tip, "fp:alice").unwrap();
    assert_eq!(ledger.len(), 3);
    assert!(ledger.verify().valid);
}

fn json_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn canonical_form_ignores_insertion_order(
        pairs in proptest::collection::btree_map("[a-zA-Z]{1,6}", json_scalar(), 0..8)
    ) {
        let forward: serde_json::Map<String, Value> = pairs.clone().into_iter().collect();
        let backward: serde_json::Map<String, Value> = pairs.into_iter().rev().collect();
        let nested_forward = json!({"outer": Value::Object(forward.clone()), "list": [Value::Object(forward)]});
        let nested_backward = json!({"list": [Value::Object(backward.clone())], "outer": Value::Object(backward)});
        prop_assert_eq!(canonical_json(&nested_forward), canonical_json(&nested_backward));
    }

    #[test]
    fn confidences_survive_export(
        scores in proptest::collection::vec((0.0f64..=1.0, 0.0f64..=1.0), 1..4)
    ) {
        let mut ledger = DecisionLedger::new();
        for (n, (confidence, alternative)) in scores.into_iter().enumerate() {
            let tip = ledger.tip();
            ledger.append(scored_record(n, confidence, alternative), &tip, "fp:alice").unwrap();
        }
        let json = ledger.export(ExportMetadata::new("checkout", "alice")).unwrap();
        let imported = import_export(&json).unwrap();
        prop_assert!(imported.chain_valid);
        prop_assert_eq!(imported.verify().broken_at, None);
        prop_assert_eq!(&imported.entries[..], ledger.entries());
    }

    #[test]
    fn tamper_is_located(len in 1usize..6, pick in any::<prop::sample::Index>(), field in any::<prop::sample::Index>()) {
        let index = pick.index(len);
        let edits = hashed_field_edits();
        let (name, replacement) = edits[field.index(edits.len())].clone();

        let mut doc = exported(len);
        doc["entries"][index][name] = replacement;
        prop_assert_eq!(broken_at(&doc), Some(index));
    }
}
