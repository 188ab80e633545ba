//! Tracegate CLI
//!
//! Library half of the `tracegate` binary: configuration loading and the
//! subcommand implementations, kept here so they can be tested without a
//! process boundary.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod commands;
mod demo;

pub use commands::{
    evaluate_json, load_config, render_rules, verify_file, with_table_override, write_output,
    EvaluateArgs, VerifyReport,
};
pub use demo::run_demo;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
