//! Signed ledger export
//!
//! Pretty-printed JSON document carrying the entries, who exported them and
//! whether the chain verified at export time. Readers accept any `2.x`
//! version and reject other majors before looking at the entries.

use crate::chain::{verify_chain, ChainVerification};
use crate::entry::DecisionLedgerEntry;
use crate::error::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version written into new exports
pub const EXPORT_VERSION: &str = "2.0";

/// Major version this build reads
pub const SUPPORTED_MAJOR_VERSION: u32 = 2;

/// Who exported what, and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub project_name: String,
    pub exported_at: DateTime<Utc>,
    pub exported_by: String,
}

impl ExportMetadata {
    /// Metadata stamped now
    #[must_use]
    pub fn new(project_name: impl Into<String>, exported_by: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            exported_at: Utc::now(),
            exported_by: exported_by.into(),
        }
    }
}

/// Parsed export document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerExport {
    pub metadata: ExportMetadata,
    pub entries: Vec<DecisionLedgerEntry>,
    /// Verdict recorded by the exporter; not trusted on import
    pub chain_valid: bool,
    pub version: String,
}

impl LedgerExport {
    /// Re-verify the imported entries
    #[must_use]
    pub fn verify(&self) -> ChainVerification {
        verify_chain(&self.entries)
    }

    /// Does the recorded `chainValid` agree with re-verification
    #[must_use]
    pub fn assertion_holds(&self) -> bool {
        self.chain_valid == self.verify().valid
    }
}

/// Serialize entries to a signed export
///
/// `chainValid` is computed here, never supplied by the caller.
///
/// # Errors
/// Returns [`LedgerError::Serialization`] if encoding fails.
pub fn export_signed(entries: &[DecisionLedgerEntry], metadata: ExportMetadata) -> Result<String, LedgerError> {
    let chain_valid = verify_chain(entries).valid;
    let doc = LedgerExport {
        metadata,
        entries: entries.to_vec(),
        chain_valid,
        version: EXPORT_VERSION.to_string(),
    };
    tracing::info!(
        entries = doc.entries.len(),
        chain_valid,
        project = %doc.metadata.project_name,
        "ledger exported"
    );
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse a signed export
///
/// # Errors
/// - [`LedgerError::UnsupportedVersion`] if the major version is not 2 or
///   the version is missing.
/// - [`LedgerError::Serialization`] if the document is not an export.
///
/// `prevHash` or `hash` text that is not a digest is kept as read; it shows up
/// as a violation at its index when the entries are verified.
pub fn import_export(json: &str) -> Result<LedgerExport, LedgerError> {
    #[derive(Deserialize)]
    struct VersionProbe {
        #[serde(default)]
        version: Option<String>,
    }

    let probe: VersionProbe = serde_json::from_str(json)?;
    let version = probe.version.unwrap_or_default();
    if major_version(&version) != Some(SUPPORTED_MAJOR_VERSION) {
        return Err(LedgerError::UnsupportedVersion {
            found: version,
            supported: SUPPORTED_MAJOR_VERSION,
        });
    }

    let doc: LedgerExport = serde_json::from_str(json)?;
    tracing::debug!(entries = doc.entries.len(), version = %doc.version, "ledger export parsed");
    Ok(doc)
}

fn major_version(version: &str) -> Option<u32> {
    version.split('.').next()?.trim().parse().ok()
}
