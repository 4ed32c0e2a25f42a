//! Leaf evaluation: resolve a selector and test every resolved value against a pattern.

use crate::model::Predicate;
use crate::resolve::resolve;
use jsongate_types::{EvalError, Violation};
use serde_json::Value;

/// The values a predicate looked at.
#[derive(Clone, Debug, PartialEq)]
pub struct Evidence {
    /// Concrete path of the reported value; `None` when nothing resolved or several values did.
    pub path: Option<String>,
    /// The first failing value, the single resolved value, or every resolved value as an array.
    pub actual: Option<Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PredicateOutcome {
    pub satisfied: bool,
    pub evidence: Evidence,
}

impl PredicateOutcome {
    /// The violation reported when an asserted predicate is not satisfied.
    pub fn violation(&self, predicate: &Predicate) -> Violation {
        Violation {
            selector: predicate.selector.to_string(),
            path: self.evidence.path.clone(),
            expected: predicate.pattern.to_value(),
            actual: self.evidence.actual.clone(),
            message: predicate.message.clone(),
        }
    }
}

/// Evaluate one predicate against `document`.
///
/// Satisfied iff the selector resolves to at least one value and every resolved value matches.
pub fn evaluate(document: &Value, predicate: &Predicate) -> Result<PredicateOutcome, EvalError> {
    let resolved = resolve(document, &predicate.selector)?;
    if resolved.is_empty() {
        return Ok(PredicateOutcome {
            satisfied: false,
            evidence: Evidence {
                path: None,
                actual: None,
            },
        });
    }

    for item in &resolved {
        if !predicate.pattern.matches(item.value)? {
            return Ok(PredicateOutcome {
                satisfied: false,
                evidence: Evidence {
                    path: Some(item.path.clone()),
                    actual: Some(item.value.clone()),
                },
            });
        }
    }

    let evidence = match resolved.as_slice() {
        [single] => Evidence {
            path: Some(single.path.clone()),
            actual: Some(single.value.clone()),
        },
        many => Evidence {
            path: None,
            actual: Some(Value::Array(many.iter().map(|r| r.value.clone()).collect())),
        },
    };
    Ok(PredicateOutcome {
        satisfied: true,
        evidence,
    })
}
