//! Path resolution: apply a `Selector` to a JSON document.
//!
//! Absence (missing field, out-of-range index, traversal through `null`) yields no value for
//! that branch. Traversing a scalar where a field or index is required is an error.

use crate::selector::{Segment, Selector, is_plain_field};
use jsongate_types::EvalError;
use serde_json::Value;

/// One value matched by a selector, with its concrete path (`items[1].name`).
#[derive(Clone, Debug, PartialEq)]
pub struct Resolved<'a> {
    pub path: String,
    pub value: &'a Value,
}

/// Resolve `selector` against `document`, fanning out on wildcards.
///
/// Results are in document order: array index order, object key order as declared.
pub fn resolve<'a>(
    document: &'a Value,
    selector: &Selector,
) -> Result<Vec<Resolved<'a>>, EvalError> {
    let mut frontier = vec![Resolved {
        path: String::new(),
        value: document,
    }];

    for segment in selector.segments() {
        let mut next = Vec::with_capacity(frontier.len());
        for current in frontier {
            step(selector, segment, current, &mut next)?;
        }
        if next.is_empty() {
            return Ok(next);
        }
        frontier = next;
    }

    Ok(frontier)
}

fn step<'a>(
    selector: &Selector,
    segment: &Segment,
    current: Resolved<'a>,
    out: &mut Vec<Resolved<'a>>,
) -> Result<(), EvalError> {
    match (segment, current.value) {
        (_, Value::Null) => {}
        (Segment::Field(name), Value::Object(map)) => {
            if let Some(value) = map.get(name) {
                out.push(Resolved {
                    path: join_field(&current.path, name),
                    value,
                });
            }
        }
        (Segment::Index(index), Value::Array(items)) => {
            if let Some(i) = normalize_index(*index, items.len()) {
                out.push(Resolved {
                    path: join_index(&current.path, i),
                    value: &items[i],
                });
            }
        }
        (Segment::Wildcard, Value::Array(items)) => {
            out.extend(items.iter().enumerate().map(|(i, value)| Resolved {
                path: join_index(&current.path, i),
                value,
            }));
        }
        (Segment::Wildcard, Value::Object(map)) => {
            out.extend(map.iter().map(|(key, value)| Resolved {
                path: join_field(&current.path, key),
                value,
            }));
        }
        (segment, value) => {
            let expected = match segment {
                Segment::Field(_) => "object",
                Segment::Index(_) => "array",
                Segment::Wildcard => "array or object",
            };
            return Err(EvalError::PathType {
                selector: selector.to_string(),
                path: display_path(&current.path),
                segment: segment.to_string(),
                expected: expected.to_string(),
                found: kind_of(value).to_string(),
            });
        }
    }
    Ok(())
}

fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let i = if index < 0 { len + index } else { index };
    if (0..len).contains(&i) {
        usize::try_from(i).ok()
    } else {
        None
    }
}

fn join_field(path: &str, name: &str) -> String {
    match (path.is_empty(), is_plain_field(name)) {
        (true, true) => name.to_string(),
        (false, true) => format!("{path}.{name}"),
        (_, false) => format!("{path}[{name:?}]"),
    }
}

fn join_index(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        path.to_string()
    }
}

/// JSON type name used in diagnostics.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
