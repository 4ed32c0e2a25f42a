use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An evaluation that could not complete.
///
/// Errors are recorded into the `RuleResult` of the rule (and identifier) that raised them;
/// they never abort sibling rules or policies.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvalError {
    /// A selector tried to traverse a value that cannot hold the requested segment,
    /// e.g. a field access on a string.
    #[error("{selector}: cannot apply `{segment}` to {found} at `{path}` (expected {expected})")]
    PathType {
        selector: String,
        /// Concrete path of the value that could not be traversed.
        path: String,
        segment: String,
        expected: String,
        found: String,
    },

    /// The caller cancelled the evaluation or its deadline elapsed.
    #[error("evaluation cancelled: {reason}")]
    Cancelled { reason: String },
}

impl EvalError {
    pub fn code(&self) -> &'static str {
        match self {
            EvalError::PathType { .. } => ids::CODE_PATH_TYPE_ERROR,
            EvalError::Cancelled { .. } => ids::CODE_CANCELLED,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, EvalError::Cancelled { .. })
    }
}
