//! Tracegate Model
//!
//! Shared vocabulary for the traceability graph.
//!
//! # Core Concepts
//!
//! - [`NodeType`]: requirement, feature or test
//! - [`EdgeType`]: implements, tests or verifies
//! - [`Verdict`]: allowed, warning or forbidden
//! - [`KnowledgeGraph`]: snapshot of nodes, edges and comments
//! - [`Purpose`]: the goal an edit is made under, plus the edit mode

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod graph;
mod node;
mod purpose;
mod verdict;

pub use graph::{
    Comment, CommentAuthor, GraphMetadata, KnowledgeEdge, KnowledgeGraph, KnowledgeNode,
    NodeMetadata, NodeStatus, Position, Priority,
};
pub use node::{EdgeType, ModelError, NodeType};
pub use purpose::{EditMode, Purpose};
pub use verdict::Verdict;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
