//! Tracegate Governance
//!
//! Turns guardrail verdicts into approved, chained ledger decisions.
//!
//! # Core Concepts
//!
//! - [`GovernanceConfig`]: rule table, fallback policy and approval thresholds
//! - [`ApprovalGate`]: checks an [`ApprovalRequest`] against the matched rule
//! - [`DecisionPipeline`]: propose → approve → compare-and-append
//!
//! # Example
//!
//! ```rust
//! use tg_governance::{ApprovalRequest, DecisionPipeline, GovernanceConfig};
//! use tg_guardrail::EdgeProposal;
//! use tg_model::{NodeType, Purpose};
//!
//! let pipeline = DecisionPipeline::from_config(&GovernanceConfig::default());
//! let proposal = EdgeProposal::new(NodeType::Requirement, "BR-001", NodeType::Feature, "Feature-001");
//! let evaluation = pipeline.propose(&proposal);
//!
//! let request = ApprovalRequest::new(
//!     Purpose::new("trace checkout rules", "checkout"),
//!     "alice",
//!     "feature realizes the business rule",
//! )
//! .aligned();
//! let entry = pipeline.approve_at_tip(&proposal, &evaluation, &request)?;
//! assert_eq!(entry.record().rules_matched, vec!["R001"]);
//! # Ok::<(), tg_governance::GovernanceError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod approval;
mod config;
mod error;
mod pipeline;

pub use approval::{Approval, ApprovalCheck, ApprovalError, ApprovalGate, ApprovalRequest, RationaleType};
pub use config::{GovernanceConfig, DEFAULT_MIN_RATIONALE_CHARS, DEFAULT_SIGNER_FINGERPRINT};
pub use error::GovernanceError;
pub use pipeline::{DecisionPipeline, ADD_EDGE_ACTION};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
