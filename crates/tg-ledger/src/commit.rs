//! Graph commits
//!
//! A [`Commit`] pairs a graph snapshot with the ledger entries that justified
//! the changes leading to it. Commits form a parent chain of their own.

use crate::chain::{verify_chain, ChainVerification};
use crate::entry::{new_commit_id, DecisionLedgerEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tg_model::KnowledgeGraph;

/// Snapshot of the graph plus its decisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub commit_id: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub author: String,
    pub graph_snapshot: KnowledgeGraph,
    pub decision_ledger_entries: Vec<DecisionLedgerEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_commit_id: Option<String>,
}

impl Commit {
    /// Root commit
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        author: impl Into<String>,
        graph_snapshot: KnowledgeGraph,
        entries: Vec<DecisionLedgerEntry>,
    ) -> Self {
        Self {
            commit_id: new_commit_id(),
            timestamp: Utc::now(),
            message: message.into(),
            author: author.into(),
            graph_snapshot,
            decision_ledger_entries: entries,
            parent_commit_id: None,
        }
    }

    /// Commit on top of `self`
    #[must_use]
    pub fn child(
        &self,
        message: impl Into<String>,
        author: impl Into<String>,
        graph_snapshot: KnowledgeGraph,
        entries: Vec<DecisionLedgerEntry>,
    ) -> Self {
        Self {
            parent_commit_id: Some(self.commit_id.clone()),
            ..Self::new(message, author, graph_snapshot, entries)
        }
    }

    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_commit_id.is_none()
    }

    /// Verify the attached entries as a chain
    #[must_use]
    pub fn verify_entries(&self) -> ChainVerification {
        verify_chain(&self.decision_ledger_entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::DecisionRecord;
    use crate::ledger::DecisionLedger;
    use crate::hash::ChainLink;
    use tg_model::{KnowledgeNode, NodeType};

    fn entries() -> Vec<DecisionLedgerEntry> {
        let mut ledger = DecisionLedger::new();
        let record = DecisionRecord::new("p", "add_node", "add BR-001", "new business rule", "carol", "one node");
        ledger.append(record, &ChainLink::Genesis, "fp:carol").unwrap();
        ledger.entries().to_vec()
    }

    #[test]
    fn child_links_to_parent() {
        let mut graph = KnowledgeGraph::empty("demo");
        let root = Commit::new("init", "carol", graph.clone(), Vec::new());
        assert!(root.is_root());

        graph.nodes.push(KnowledgeNode::new("req-001", NodeType::Requirement, "BR-001"));
        let child = root.child("add requirement", "carol", graph, entries());
        assert_eq!(child.parent_commit_id.as_deref(), Some(root.commit_id.as_str()));
        assert_ne!(child.commit_id, root.commit_id);
        assert!(child.verify_entries().valid);
    }

    #[test]
    fn serializes_camel_case() {
        let commit = Commit::new("init", "carol", KnowledgeGraph::empty("demo"), entries());
        let json = serde_json::to_value(&commit).unwrap();
        assert!(json.get("graphSnapshot").is_some());
        assert_eq!(json["decisionLedgerEntries"][0]["approver"], "carol");
        assert!(json.get("parentCommitId").is_none());

        let back: Commit = serde_json::from_value(json).unwrap();
        assert_eq!(back, commit);
    }
}
