//! Tracegate Decision Ledger
//!
//! Append-only, hash-chained record of approved graph changes.
//!
//! # Core Concepts
//!
//! - [`DecisionRecord`]: what was decided, by whom and why
//! - [`DecisionLedgerEntry`]: a record chained by `prevHash` and `hash`
//! - [`LedgerHash`] / [`ChainLink`] / [`StoredHash`]: SHA-256 digests, the
//!   genesis sentinel and leniently-read hash slots
//! - [`verify_chain`] / [`scan_chain`]: tamper detection as data
//! - [`DecisionLedger`] / [`SharedLedger`]: compare-and-append stores
//! - [`export_signed`] / [`import_export`]: versioned JSON export
//!
//! # Example
//!
//! ```rust
//! use tg_ledger::{ChainLink, DecisionLedger, DecisionRecord};
//!
//! let mut ledger = DecisionLedger::new();
//! let record = DecisionRecord::new(
//!     "trace checkout requirements",
//!     "add_edge",
//!     "BR-001 implements Feature-001",
//!     "feature delivers the rule",
//!     "alice",
//!     "allowed implements edge",
//! );
//! ledger.append(record, &ChainLink::Genesis, "fp:alice")?;
//! assert!(ledger.verify().valid);
//! # Ok::<(), tg_ledger::LedgerError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod canonical;
mod chain;
mod commit;
mod entry;
mod error;
mod export;
mod hash;
mod ledger;

pub use canonical::{canonical_json, canonicalize};
pub use chain::{
    compute_entry_hash, create_entry, scan_chain, verify_chain, ChainVerification, ChainViolation,
    ViolationKind,
};
pub use commit::Commit;
pub use entry::{
    new_commit_id, Alternative, AlternativeRationale, Change, ChangeOp, CoverageDelta,
    DecisionLedgerEntry, DecisionRecord, Signature,
};
pub use error::LedgerError;
pub use export::{
    export_signed, import_export, ExportMetadata, LedgerExport, EXPORT_VERSION,
    SUPPORTED_MAJOR_VERSION,
};
pub use hash::{compute_hash, ChainLink, HashError, LedgerHash, StoredHash, GENESIS_SENTINEL};
pub use ledger::{DecisionLedger, SharedLedger};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
