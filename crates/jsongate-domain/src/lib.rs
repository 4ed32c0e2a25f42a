//! Pure policy evaluation (no IO).
//!
//! Input: policies and a JSON resource constructed elsewhere.
//! Output: a `Response` with one result per (policy, rule, identifier).

#![forbid(unsafe_code)]

pub mod condition;
pub mod context;
pub mod identifier;
pub mod model;
pub mod options;
pub mod pattern;
pub mod predicate;
pub mod report;
pub mod resolve;
pub mod rule;
pub mod selector;

mod engine;
mod fingerprint;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use condition::Condition;
pub use context::{CancelHandle, EvalContext};
pub use engine::{Engine, EngineError};
pub use model::{Policy, Predicate, Request, Rule};
pub use options::{EngineOptions, FailOn, IdentifierStyle};
pub use pattern::{Pattern, PatternKey};
pub use report::Summary;
pub use selector::{Segment, Selector, SelectorError};
