//! Subcommand implementations
//!
//! Each command returns its output as a string so `main` only prints and
//! picks the exit code. All file access goes through `tokio::fs`.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;
use tg_governance::GovernanceConfig;
use tg_guardrail::{EdgeProposal, RuleTable, TableVariant};
use tg_ledger::{import_export, scan_chain, ChainVerification, ChainViolation};
use tg_model::NodeType;

/// Load configuration, or defaults when no path is given
///
/// # Errors
/// Fails if the file cannot be read or is not a valid configuration.
pub async fn load_config(path: Option<&Path>) -> Result<GovernanceConfig> {
    let Some(path) = path else {
        return Ok(GovernanceConfig::default());
    };
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = GovernanceConfig::from_toml_str(&source)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(path = %path.display(), table = ?config.table, "configuration loaded");
    Ok(config)
}

/// Apply a `--table` override; an explicit variant replaces custom rules
#[must_use]
pub fn with_table_override(mut config: GovernanceConfig, table: Option<TableVariant>) -> GovernanceConfig {
    if let Some(variant) = table {
        config.rules = None;
        config.table = variant;
    }
    config
}

/// Human-readable rule table
#[must_use]
pub fn render_rules(table: &RuleTable) -> String {
    let mut out = String::new();
    for rule in table.rules() {
        let req = rule.approval_requirement;
        let _ = writeln!(
            out,
            "{:<5} {:<24} {:<9} {} approver(s){}{}  {}",
            rule.rule_id,
            rule.pattern.to_string(),
            rule.verdict.as_str(),
            req.approver_count,
            if req.reason_required { ", reason" } else { "" },
            if req.power_mode_only { ", power mode" } else { "" },
            rule.name,
        );
    }
    out
}

/// Arguments of `evaluate`
#[derive(Debug, Clone)]
pub struct EvaluateArgs {
    pub source: String,
    pub target: String,
    pub source_label: String,
    pub target_label: String,
    pub source_id: Option<String>,
    pub target_id: Option<String>,
}

/// Evaluate one edge and render the evaluation as JSON
///
/// # Errors
/// Fails on unknown node types.
pub fn evaluate_json(config: &GovernanceConfig, args: &EvaluateArgs) -> Result<String> {
    let source: NodeType = args.source.parse()?;
    let target: NodeType = args.target.parse()?;

    let mut proposal = EdgeProposal::new(source, &args.source_label, target, &args.target_label);
    proposal.source_id.clone_from(&args.source_id);
    proposal.target_id.clone_from(&args.target_id);

    let evaluation = config.build_engine().evaluate(&proposal);
    Ok(serde_json::to_string_pretty(&evaluation)?)
}

/// Outcome of `verify`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
    pub project_name: String,
    pub version: String,
    pub entries: usize,
    /// `chainValid` as recorded by the exporter
    pub asserted_valid: bool,
    pub verification: ChainVerification,
    pub violations: Vec<ChainViolation>,
}

impl VerifyReport {
    /// Chain verifies and the export told the truth about it
    #[must_use]
    pub fn passed(&self) -> bool {
        self.verification.valid && self.asserted_valid
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "project:  {}", self.project_name);
        let _ = writeln!(out, "version:  {}", self.version);
        let _ = writeln!(out, "entries:  {}", self.entries);
        let _ = writeln!(out, "asserted: {}", if self.asserted_valid { "valid" } else { "invalid" });
        let _ = writeln!(out, "verified: {}", if self.verification.valid { "valid" } else { "BROKEN" });
        if self.asserted_valid != self.verification.valid {
            let _ = writeln!(out, "warning:  chainValid in the export does not match verification");
        }
        for violation in &self.violations {
            let _ = writeln!(out, "  {violation}");
        }
        out
    }
}

/// Import an export file and verify it
///
/// # Errors
/// Fails if the file cannot be read, is not an export, or has an
/// unsupported version. A broken chain is a report, not an error.
pub async fn verify_file(path: &Path) -> Result<VerifyReport> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading export {}", path.display()))?;
    let export = import_export(&json).with_context(|| format!("importing {}", path.display()))?;

    let verification = export.verify();
    let violations = scan_chain(&export.entries);
    if !export.assertion_holds() {
        tracing::warn!(path = %path.display(), "export misreports its chain validity");
    }

    Ok(VerifyReport {
        project_name: export.metadata.project_name.clone(),
        version: export.version.clone(),
        entries: export.entries.len(),
        asserted_valid: export.chain_valid,
        verification,
        violations,
    })
}

/// Write output to a file, refusing to overwrite a directory
///
/// # Errors
/// Fails if the target is a directory or cannot be written.
pub async fn write_output(path: &Path, contents: &str) -> Result<()> {
    if tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir()) {
        bail!("{} is a directory", path.display());
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "output written");
    Ok(())
}
