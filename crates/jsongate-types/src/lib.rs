//! Stable DTOs and IDs used across the jsongate workspace.
//!
//! This crate is intentionally boring:
//! - the evaluation response (policy results, rule results, violations)
//! - the evaluation error taxonomy embedded in rule results
//! - stable string IDs and codes
//! - the report envelope written by the CLI

#![forbid(unsafe_code)]

pub mod error;
pub mod ids;
pub mod receipt;
pub mod response;

pub use error::EvalError;
pub use receipt::{ReportEnvelope, ResultCounts, ToolMeta, Verdict, SCHEMA_REPORT_V1};
pub use response::{Outcome, PolicyResult, Response, RuleResult, Violation};
