//! Expected-value patterns.
//!
//! Scalars compare by JSON equality (numbers numerically). Objects match partially: every key
//! in the pattern must be present in the actual object and match; extra keys are ignored.
//! Arrays match index by index; every pattern index must exist in the actual array.
//!
//! Inside an object pattern a key written `(selector)` is a projection: the selector is
//! resolved against the actual object and every resolved value must match.

use crate::resolve::resolve;
use crate::selector::{Selector, SelectorError};
use jsongate_types::EvalError;
use serde_json::{Map, Number, Value};

#[derive(Clone, Debug, PartialEq)]
pub enum PatternKey {
    Field(String),
    Projection(Selector),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    Literal(Value),
    Object(Vec<(PatternKey, Pattern)>),
    Array(Vec<Pattern>),
}

impl Pattern {
    /// Compile a decoded JSON/YAML value into a pattern.
    pub fn from_value(value: &Value) -> Result<Self, SelectorError> {
        match value {
            Value::Object(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, sub) in map {
                    entries.push((pattern_key(key)?, Pattern::from_value(sub)?));
                }
                Ok(Pattern::Object(entries))
            }
            Value::Array(items) => items
                .iter()
                .map(Pattern::from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Pattern::Array),
            scalar => Ok(Pattern::Literal(scalar.clone())),
        }
    }

    /// The pattern in its source form, used as `expected` evidence.
    pub fn to_value(&self) -> Value {
        match self {
            Pattern::Literal(v) => v.clone(),
            Pattern::Object(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, sub) in entries {
                    let key = match key {
                        PatternKey::Field(name) => name.clone(),
                        PatternKey::Projection(sel) => format!("({sel})"),
                    };
                    map.insert(key, sub.to_value());
                }
                Value::Object(map)
            }
            Pattern::Array(items) => Value::Array(items.iter().map(Pattern::to_value).collect()),
        }
    }

    /// Whether `actual` satisfies this pattern.
    ///
    /// Fails only when a projection selector cannot traverse the actual value.
    pub fn matches(&self, actual: &Value) -> Result<bool, EvalError> {
        match self {
            Pattern::Literal(expected) => Ok(json_eq(actual, expected)),
            Pattern::Object(entries) => {
                let Value::Object(map) = actual else {
                    return Ok(false);
                };
                for (key, sub) in entries {
                    let ok = match key {
                        PatternKey::Field(name) => match map.get(name) {
                            Some(value) => sub.matches(value)?,
                            None => false,
                        },
                        PatternKey::Projection(sel) => {
                            let resolved = resolve(actual, sel)?;
                            if resolved.is_empty() {
                                false
                            } else {
                                all_match(sub, resolved.iter().map(|r| r.value))?
                            }
                        }
                    };
                    if !ok {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Pattern::Array(items) => {
                let Value::Array(values) = actual else {
                    return Ok(false);
                };
                if values.len() < items.len() {
                    return Ok(false);
                }
                all_pairs_match(items.iter().zip(values))
            }
        }
    }
}

fn all_match<'v>(
    pattern: &Pattern,
    values: impl Iterator<Item = &'v Value>,
) -> Result<bool, EvalError> {
    for value in values {
        if !pattern.matches(value)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn all_pairs_match<'v>(
    pairs: impl Iterator<Item = (&'v Pattern, &'v Value)>,
) -> Result<bool, EvalError> {
    for (pattern, value) in pairs {
        if !pattern.matches(value)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn pattern_key(key: &str) -> Result<PatternKey, SelectorError> {
    match projection_selector(key) {
        Some(inner) => Selector::parse(inner).map(PatternKey::Projection),
        None => Ok(PatternKey::Field(key.to_string())),
    }
}

/// The selector text of a `(selector)` key, if `key` is one.
pub fn projection_selector(key: &str) -> Option<&str> {
    key.strip_prefix('(')?.strip_suffix(')')
}

/// JSON equality with numbers compared by value (`1`, `1.0` and `1e0` are equal).
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_eq(x, y),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| json_eq(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| json_eq(v, other)))
        }
        _ => a == b,
    }
}

fn numbers_eq(x: &Number, y: &Number) -> bool {
    match (exact_integer(x), exact_integer(y)) {
        (Some(a), Some(b)) => a == b,
        (Some(a), None) => y.as_f64().is_some_and(|f| whole_float_eq(a, f)),
        (None, Some(b)) => x.as_f64().is_some_and(|f| whole_float_eq(b, f)),
        (None, None) => match (x.as_f64(), y.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
    }
}

fn exact_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Integer against float without rounding the integer: the float must be finite, whole and
/// within `i128` range, and is then compared as an integer.
fn whole_float_eq(int: i128, float: f64) -> bool {
    // 2^127, the first value past the i128 range.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if !float.is_finite() || float.fract() != 0.0 || !(-LIMIT..LIMIT).contains(&float) {
        return false;
    }
    float as i128 == int
}
