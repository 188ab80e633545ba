//! Testing utilities for the Tracegate workspace
//!
//! Shared fixtures: the sample checkout graph, canonical proposals and
//! ready-made ledgers.

#![allow(missing_docs)]

use tg_guardrail::EdgeProposal;
use tg_ledger::{DecisionLedger, DecisionRecord};
use tg_model::{EditMode, EdgeType, KnowledgeEdge, KnowledgeGraph, KnowledgeNode, NodeType, Purpose};

pub const SIGNER_FINGERPRINT: &str = "SHA256:test-signer";

pub fn purpose() -> Purpose {
    Purpose::new("reduce checkout abandonment by 15%", "checkout")
}

pub fn power_purpose() -> Purpose {
    purpose().with_mode(EditMode::Power)
}

/// BR-002 → Feature-001, the canonical allowed edge
pub fn requirement_to_feature() -> EdgeProposal {
    EdgeProposal::new(NodeType::Requirement, "BR-002", NodeType::Feature, "Feature-001")
        .with_ids("req-002", "feat-001")
}

/// Feature-001 → BR-002, the reversed edge
pub fn feature_to_requirement() -> EdgeProposal {
    requirement_to_feature().reversed()
}

/// Feature-001 → TC-001, the other reversed edge
pub fn feature_to_test() -> EdgeProposal {
    EdgeProposal::new(NodeType::Feature, "Feature-001", NodeType::Test, "TC-001")
        .with_ids("feat-001", "test-001")
}

pub fn sample_record(n: usize) -> DecisionRecord {
    DecisionRecord::new(
        purpose().summary(),
        "add_edge",
        format!("req-{n:03} → feat-{n:03}"),
        "feature delivers the business rule",
        "alice",
        format!("allowed implements edge number {n}"),
    )
    .with_commit_id(format!("commit-{n:03}"))
    .with_rules_matched(["R001"])
}

/// Ledger holding `len` sample records
pub fn sample_ledger(len: usize) -> DecisionLedger {
    let mut ledger = DecisionLedger::new();
    for n in 0..len {
        let tip = ledger.tip();
        ledger
            .append(sample_record(n), &tip, SIGNER_FINGERPRINT)
            .unwrap();
    }
    ledger
}

/// Checkout graph: two requirements, one feature, one test
pub fn sample_graph() -> KnowledgeGraph {
    let mut graph = KnowledgeGraph::empty("checkout");
    graph.nodes = vec![
        KnowledgeNode::new("req-001", NodeType::Requirement, "BR-001")
            .with_description("Guest checkout is available"),
        KnowledgeNode::new("req-002", NodeType::Requirement, "BR-002")
            .with_description("Saved cards are offered at payment"),
        KnowledgeNode::new("feat-001", NodeType::Feature, "Feature-001"),
        KnowledgeNode::new("test-001", NodeType::Test, "TC-001"),
    ];
    graph.edges = vec![
        edge("e-001", "req-001", "feat-001", EdgeType::Implements),
        edge("e-002", "test-001", "feat-001", EdgeType::Tests),
        edge("e-003", "test-001", "req-001", EdgeType::Verifies),
    ];
    graph
}

fn edge(id: &str, source: &str, target: &str, edge_type: EdgeType) -> KnowledgeEdge {
    KnowledgeEdge {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
        label: None,
        edge_type,
    }
}
