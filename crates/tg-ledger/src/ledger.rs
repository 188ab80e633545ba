//! Append-only decision ledger
//!
//! [`DecisionLedger`] is the single-writer chain. Appends are
//! compare-and-append against the caller's view of the tip, so two writers
//! that built on the same tip cannot both succeed.
//!
//! [`SharedLedger`] is the cross-thread handle.

use crate::chain::{create_entry, first_violation, scan_chain, verify_chain, ChainVerification, ChainViolation};
use crate::entry::{DecisionLedgerEntry, DecisionRecord};
use crate::error::LedgerError;
use crate::export::{export_signed, ExportMetadata};
use crate::hash::ChainLink;
use parking_lot::RwLock;
use std::sync::Arc;

/// In-memory hash-chained ledger
#[derive(Debug, Clone, Default)]
pub struct DecisionLedger {
    entries: Vec<DecisionLedgerEntry>,
}

impl DecisionLedger {
    /// Create empty ledger
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing chain
    ///
    /// # Errors
    /// Returns [`LedgerError::IntegrityViolation`] with the first violation if
    /// the chain does not verify.
    pub fn from_entries(entries: Vec<DecisionLedgerEntry>) -> Result<Self, LedgerError> {
        if let Some(violation) = first_violation(&entries) {
            tracing::warn!(index = violation.index, "refusing to adopt broken chain");
            return Err(LedgerError::IntegrityViolation(violation));
        }
        Ok(Self { entries })
    }

    /// Link the next entry must carry as `prevHash`
    #[must_use]
    pub fn tip(&self) -> ChainLink {
        self.entries
            .last()
            .map_or(ChainLink::Genesis, DecisionLedgerEntry::link)
    }

    /// All entries, oldest first
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[DecisionLedgerEntry] {
        &self.entries
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by position
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DecisionLedgerEntry> {
        self.entries.get(index)
    }

    /// Entry by commit id
    #[must_use]
    pub fn find(&self, commit_id: &str) -> Option<&DecisionLedgerEntry> {
        self.entries.iter().find(|entry| entry.commit_id() == commit_id)
    }

    /// Chain `record` onto the tip
    ///
    /// # Errors
    /// - [`LedgerError::ChainConflict`] if `expected_tip` is not the current
    ///   tip; the ledger is unchanged.
    /// - [`LedgerError::InvalidArgument`] if the record is incomplete.
    pub fn append(
        &mut self,
        record: DecisionRecord,
        expected_tip: &ChainLink,
        signer_fingerprint: &str,
    ) -> Result<&DecisionLedgerEntry, LedgerError> {
        let actual = self.tip();
        if *expected_tip != actual {
            tracing::warn!(
                expected = %expected_tip,
                actual = %actual,
                "ledger append rejected: stale tip"
            );
            return Err(LedgerError::ChainConflict {
                expected: expected_tip.clone(),
                actual,
            });
        }

        let entry = create_entry(record, actual, signer_fingerprint)?;
        tracing::info!(
            index = self.entries.len(),
            commit_id = %entry.commit_id(),
            hash = %entry.hash.short(),
            approver = %entry.record.approver,
            "ledger entry appended"
        );
        self.entries.push(entry);

        let index = self.entries.len() - 1;
        Ok(&self.entries[index])
    }

    /// Verify the stored chain
    #[must_use]
    pub fn verify(&self) -> ChainVerification {
        verify_chain(&self.entries)
    }

    /// Every violation in the stored chain
    #[must_use]
    pub fn violations(&self) -> Vec<ChainViolation> {
        scan_chain(&self.entries)
    }

    /// Export the chain as signed JSON
    ///
    /// # Errors
    /// Returns [`LedgerError::Serialization`] if encoding fails.
    pub fn export(&self, metadata: ExportMetadata) -> Result<String, LedgerError> {
        export_signed(&self.entries, metadata)
    }
}

/// Thread-safe ledger handle
///
/// Clones share the same chain. Appends racing on one tip produce exactly
/// one success; the others get [`LedgerError::ChainConflict`] and may retry
/// against the new tip.
#[derive(Debug, Clone, Default)]
pub struct SharedLedger {
    inner: Arc<RwLock<DecisionLedger>>,
}

impl SharedLedger {
    /// Create empty shared ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing ledger
    #[must_use]
    pub fn from_ledger(ledger: DecisionLedger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    #[must_use]
    pub fn tip(&self) -> ChainLink {
        self.inner.read().tip()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Compare-and-append; returns a copy of the new entry
    ///
    /// # Errors
    /// Same as [`DecisionLedger::append`].
    pub fn append(
        &self,
        record: DecisionRecord,
        expected_tip: &ChainLink,
        signer_fingerprint: &str,
    ) -> Result<DecisionLedgerEntry, LedgerError> {
        let mut ledger = self.inner.write();
        ledger
            .append(record, expected_tip, signer_fingerprint)
            .cloned()
    }

    /// Copy of the entries at this moment
    #[must_use]
    pub fn snapshot(&self) -> Vec<DecisionLedgerEntry> {
        self.inner.read().entries().to_vec()
    }

    #[must_use]
    pub fn verify(&self) -> ChainVerification {
        self.inner.read().verify()
    }

    /// Export the chain as signed JSON
    ///
    /// # Errors
    /// Returns [`LedgerError::Serialization`] if encoding fails.
    pub fn export(&self, metadata: ExportMetadata) -> Result<String, LedgerError> {
        self.inner.read().export(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;

    fn record(n: usize) -> DecisionRecord {
        DecisionRecord::new(
            "trace every requirement",
            "add_edge",
            format!("edge {n}"),
            "approved after review",
            "alice",
            "adds one implements edge",
        )
    }

    #[test]
    fn new_ledger_is_empty_and_valid() {
        let ledger = DecisionLedger::new();
        assert!(ledger.is_empty());
        assert!(ledger.tip().is_genesis());
        assert!(ledger.verify().valid);
    }

    #[test]
    fn append_advances_tip() {
        let mut ledger = DecisionLedger::new();
        let first = ledger.append(record(0), &ChainLink::Genesis, "fp").unwrap().clone();
        assert!(first.prev_hash().is_genesis());
        assert_eq!(ledger.tip(), first.link());

        let tip = ledger.tip();
        let second = ledger.append(record(1), &tip, "fp").unwrap();
        assert_eq!(*second.prev_hash(), first.link());
        assert_eq!(ledger.len(), 2);
        assert!(ledger.verify().valid);
        assert!(ledger.find(first.commit_id()).is_some());
    }

    #[test]
    fn stale_tip_is_rejected_without_change() {
        let mut ledger = DecisionLedger::new();
        ledger.append(record(0), &ChainLink::Genesis, "fp").unwrap();
        let before = ledger.tip();

        let err = ledger.append(record(1), &ChainLink::Genesis, "fp").unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(
            err,
            LedgerError::ChainConflict { expected: ChainLink::Genesis, actual } if actual == before
        ));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.tip(), before);
    }

    #[test]
    fn invalid_record_is_not_appended() {
        let mut ledger = DecisionLedger::new();
        let mut bad = record(0);
        bad.approver = String::new();
        let err = ledger.append(bad, &ChainLink::Genesis, "fp").unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn from_entries_refuses_broken_chain() {
        let mut ledger = DecisionLedger::new();
        ledger.append(record(0), &ChainLink::Genesis, "fp").unwrap();
        let tip = ledger.tip();
        ledger.append(record(1), &tip, "fp").unwrap();

        let mut entries = ledger.entries().to_vec();
        assert!(DecisionLedger::from_entries(entries.clone()).is_ok());

        entries[1].record.selected_option = "something else".to_string();
        let err = DecisionLedger::from_entries(entries).unwrap_err();
        assert!(matches!(err, LedgerError::IntegrityViolation(v) if v.index == 1));
    }

    #[test]
    fn racing_appends_have_one_winner() {
        let shared = SharedLedger::new();
        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));

        let handles: Vec<_> = (0..threads)
            .map(|n| {
                let ledger = shared.clone();
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    ledger.append(record(n), &ChainLink::Genesis, "fp")
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(LedgerError::is_retryable));
        assert_eq!(shared.len(), 1);
    }

    #[test]
    fn loser_can_retry_on_new_tip() {
        let shared = SharedLedger::new();
        let stale = shared.tip();
        shared.append(record(0), &stale, "fp").unwrap();
        assert!(shared.append(record(1), &stale, "fp").is_err());

        let entry = shared.append(record(1), &shared.tip(), "fp").unwrap();
        assert_eq!(shared.snapshot().last(), Some(&entry));
        assert!(shared.verify().valid);
    }
}
