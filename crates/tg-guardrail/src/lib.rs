//! Tracegate Guardrails
//!
//! Rule-based classification of proposed traceability edges into
//! allowed / warning / forbidden verdicts with justification.
//!
//! # Core Concepts
//!
//! - [`GuardrailRule`]: pattern, verdict, color and approval requirement
//! - [`RuleTable`]: validated ordered rules; strict and lenient variants
//! - [`GuardrailEngine`]: pure evaluation of an [`EdgeProposal`]
//! - [`GuardrailEvaluation`]: verdict, message and optional [`Normalization`]
//!
//! # Example
//!
//! ```rust
//! use tg_guardrail::{GuardrailEngine, RuleTable};
//! use tg_model::{NodeType, Verdict};
//!
//! let engine = GuardrailEngine::new(RuleTable::strict());
//! let eval = engine.evaluate_edge(NodeType::Requirement, NodeType::Feature, "BR-001", "Feature-001");
//! assert_eq!(eval.verdict, Verdict::Allowed);
//! assert_eq!(eval.rule_id(), "R001");
//! ```

#![allow(missing_docs)]
#![warn(unreachable_pub)]

mod engine;
mod error;
mod evaluation;
mod message;
mod normalize;
mod rule;
mod table;

pub use engine::GuardrailEngine;
pub use error::GuardrailError;
pub use evaluation::{EdgeProposal, GuardrailEvaluation, Normalization};
pub use normalize::{reversal_reason, REVERSED_REQUIREMENT_REASON, REVERSED_TEST_REASON};
pub use rule::{
    ApprovalRequirement, FallbackPolicy, GuardrailRule, RulePattern, TypePattern,
    FALLBACK_RULE_ID, WILDCARD,
};
pub use table::{RuleTable, TableVariant};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
