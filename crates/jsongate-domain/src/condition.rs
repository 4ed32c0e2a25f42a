//! Boolean condition trees shared by `match`, `exclude` and `assert`.
//!
//! One evaluator serves both uses. In [`Mode::Match`] only satisfaction matters and `all`
//! short-circuits. In [`Mode::Assert`] every child of an `all` is evaluated and each failing
//! leaf contributes a violation; a failing `any` or `none` contributes one violation for the
//! whole block.

use crate::context::EvalContext;
use crate::model::Predicate;
use crate::predicate;
use crate::selector::Segment;
use jsongate_types::{EvalError, Violation, ids};
use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    All(Vec<Condition>),
    Any(Vec<Condition>),
    None(Vec<Condition>),
    Leaf(Predicate),
}

impl Condition {
    /// The tree in policy-document form.
    pub fn to_value(&self) -> Value {
        match self {
            Condition::All(children) => block(ids::BLOCK_ALL, children),
            Condition::Any(children) => block(ids::BLOCK_ANY, children),
            Condition::None(children) => block(ids::BLOCK_NONE, children),
            Condition::Leaf(predicate) => {
                let key = match predicate.selector.segments() {
                    [Segment::Field(name)] if !name.starts_with('(') => name.clone(),
                    _ => format!("({})", predicate.selector),
                };
                let mut check = Map::new();
                check.insert(key, predicate.pattern.to_value());
                match &predicate.message {
                    Some(message) => {
                        let mut wrapper = Map::new();
                        wrapper.insert("check".to_string(), Value::Object(check));
                        wrapper.insert("message".to_string(), Value::String(message.clone()));
                        Value::Object(wrapper)
                    }
                    None => Value::Object(check),
                }
            }
        }
    }
}

fn block(tag: &str, children: &[Condition]) -> Value {
    let mut map = Map::new();
    map.insert(
        tag.to_string(),
        Value::Array(children.iter().map(Condition::to_value).collect()),
    );
    Value::Object(map)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Match,
    Assert,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeOutcome {
    pub satisfied: bool,
    /// Empty unless evaluated in [`Mode::Assert`] and not satisfied.
    pub violations: Vec<Violation>,
    /// Values the tree looked at; a leaf's resolved value, an array for a block.
    pub actual: Value,
}

/// Evaluate `condition` against `document`.
///
/// The context is checked before every predicate. Any error aborts the whole tree.
pub fn evaluate(
    document: &Value,
    condition: &Condition,
    mode: Mode,
    ctx: &EvalContext,
) -> Result<TreeOutcome, EvalError> {
    match condition {
        Condition::Leaf(p) => {
            ctx.check()?;
            let out = predicate::evaluate(document, p)?;
            let violations = if mode == Mode::Assert && !out.satisfied {
                vec![out.violation(p)]
            } else {
                Vec::new()
            };
            Ok(TreeOutcome {
                satisfied: out.satisfied,
                violations,
                actual: out.evidence.actual.unwrap_or(Value::Null),
            })
        }
        Condition::All(children) => {
            let mut satisfied = true;
            let mut violations = Vec::new();
            let mut actuals = Vec::with_capacity(children.len());
            for child in children {
                let out = evaluate(document, child, mode, ctx)?;
                actuals.push(out.actual);
                if !out.satisfied {
                    satisfied = false;
                    violations.extend(out.violations);
                    if mode == Mode::Match {
                        break;
                    }
                }
            }
            Ok(TreeOutcome {
                satisfied,
                violations,
                actual: Value::Array(actuals),
            })
        }
        Condition::Any(children) => {
            let mut actuals = Vec::with_capacity(children.len());
            let mut rejected = Vec::new();
            for child in children {
                let out = evaluate(document, child, mode, ctx)?;
                if out.satisfied {
                    return Ok(TreeOutcome {
                        satisfied: true,
                        violations: Vec::new(),
                        actual: out.actual,
                    });
                }
                actuals.push(out.actual);
                rejected.extend(out.violations);
            }
            let actual = Value::Array(actuals);
            let violations = match mode {
                Mode::Match => Vec::new(),
                Mode::Assert => vec![Violation {
                    selector: ids::BLOCK_ANY.to_string(),
                    path: None,
                    expected: condition.to_value(),
                    actual: Some(actual.clone()),
                    message: Some(no_alternative_message(&rejected)),
                }],
            };
            Ok(TreeOutcome {
                satisfied: false,
                violations,
                actual,
            })
        }
        Condition::None(children) => {
            let mut matched = Vec::new();
            for child in children {
                let out = evaluate(document, child, Mode::Match, ctx)?;
                if out.satisfied {
                    matched.push(out.actual);
                    if mode == Mode::Match {
                        break;
                    }
                }
            }
            let satisfied = matched.is_empty();
            let actual = Value::Array(matched);
            let violations = if mode == Mode::Assert && !satisfied {
                vec![Violation {
                    selector: ids::BLOCK_NONE.to_string(),
                    path: None,
                    expected: condition.to_value(),
                    message: Some(format!(
                        "{} of {} excluded conditions matched",
                        actual.as_array().map_or(0, Vec::len),
                        children.len()
                    )),
                    actual: Some(actual.clone()),
                }]
            } else {
                Vec::new()
            };
            Ok(TreeOutcome {
                satisfied,
                violations,
                actual,
            })
        }
    }
}

fn no_alternative_message(rejected: &[Violation]) -> String {
    if rejected.is_empty() {
        return "no alternative satisfied".to_string();
    }
    let reasons: Vec<String> = rejected.iter().map(ToString::to_string).collect();
    format!("no alternative satisfied: {}", reasons.join(" | "))
}
