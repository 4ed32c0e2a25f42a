//! Condition tree decoding.
//!
//! A node is one of:
//! - a mapping whose keys are all `all` / `any` / `none`: one block per key, implicitly
//!   combined with `all` when there are several
//! - a mapping `{check: <node>, message: <string>}`: the check with a message on every leaf
//! - any other mapping: one leaf per entry, combined with `all`
//! - a list: every element is a node, combined with `all`
//!
//! Leaf keys written `(selector)` are parsed selectors; plain keys are literal field names.

use crate::error::TreeError;
use jsongate_domain::pattern::projection_selector;
use jsongate_domain::resolve::kind_of;
use jsongate_domain::{Condition, Pattern, Predicate, Selector};
use jsongate_types::ids;
use serde_json::{Map, Value};

const CHECK: &str = "check";
const MESSAGE: &str = "message";

pub(crate) fn decode_node(value: &Value) -> Result<Condition, TreeError> {
    match value {
        Value::Object(map) => decode_mapping(map),
        Value::Array(items) => decode_children(items).map(Condition::All),
        other => Err(TreeError::NodeShape {
            found: kind_of(other),
        }),
    }
}

fn decode_mapping(map: &Map<String, Value>) -> Result<Condition, TreeError> {
    let combinator = map.keys().find(|k| is_combinator(k));

    if let Some(combinator) = combinator {
        if let Some(key) = map.keys().find(|k| !is_combinator(k)) {
            return Err(TreeError::MixedKeys {
                combinator: combinator.clone(),
                key: key.clone(),
            });
        }
        let mut blocks = Vec::with_capacity(map.len());
        for (key, children) in map {
            blocks.push(decode_block(key, children)?);
        }
        return Ok(match blocks.len() {
            1 => blocks.remove(0),
            _ => Condition::All(blocks),
        });
    }

    if let Some(check) = map.get(CHECK) {
        return decode_check(map, check);
    }

    let mut leaves = Vec::with_capacity(map.len());
    for (key, expected) in map {
        let selector = match projection_selector(key) {
            Some(inner) => Selector::parse(inner)?,
            None => Selector::field(key.as_str()),
        };
        let pattern = Pattern::from_value(expected)?;
        leaves.push(Condition::Leaf(Predicate::new(selector, pattern)));
    }
    Ok(Condition::All(leaves))
}

fn decode_block(key: &str, children: &Value) -> Result<Condition, TreeError> {
    let nodes = match children {
        Value::Array(items) => decode_children(items)?,
        Value::Object(_) => vec![decode_node(children)?],
        other => {
            return Err(TreeError::BlockChildren {
                key: key.to_string(),
                found: kind_of(other),
            });
        }
    };
    Ok(match key {
        ids::BLOCK_ANY => Condition::Any(nodes),
        ids::BLOCK_NONE => Condition::None(nodes),
        _ => Condition::All(nodes),
    })
}

fn decode_children(items: &[Value]) -> Result<Vec<Condition>, TreeError> {
    items.iter().map(decode_node).collect()
}

fn decode_check(map: &Map<String, Value>, check: &Value) -> Result<Condition, TreeError> {
    if let Some(key) = map.keys().find(|k| *k != CHECK && *k != MESSAGE) {
        return Err(TreeError::CheckKey { key: key.clone() });
    }
    if !check.is_object() {
        return Err(TreeError::CheckShape {
            found: kind_of(check),
        });
    }
    let message = match map.get(MESSAGE) {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(TreeError::MessageShape),
    };

    let mut tree = decode_node(check)?;
    if let Some(message) = message {
        attach_message(&mut tree, &message);
    }
    Ok(tree)
}

fn attach_message(tree: &mut Condition, message: &str) {
    match tree {
        Condition::Leaf(predicate) => predicate.message = Some(message.to_string()),
        Condition::All(children) | Condition::Any(children) | Condition::None(children) => {
            for child in children {
                attach_message(child, message);
            }
        }
    }
}

fn is_combinator(key: &str) -> bool {
    matches!(key, ids::BLOCK_ALL | ids::BLOCK_ANY | ids::BLOCK_NONE)
}
