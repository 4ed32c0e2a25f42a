//! Identifier fan-out: one label per value the rule's identifier selector resolves to.

use crate::fingerprint::fingerprint_value;
use crate::options::{EngineOptions, IdentifierStyle};
use crate::resolve::resolve;
use crate::selector::Selector;
use jsongate_types::EvalError;
use serde_json::Value;

/// Resolve the identifiers a rule reports under, in document order.
///
/// No selector (or the root selector) yields exactly one identifier,
/// `options.identifier_default`. A selector resolving to nothing yields none.
pub fn resolve_identifiers(
    document: &Value,
    selector: Option<&Selector>,
    options: &EngineOptions,
) -> Result<Vec<String>, EvalError> {
    let Some(selector) = selector.filter(|s| !s.is_root()) else {
        return Ok(vec![options.identifier_default.clone()]);
    };

    Ok(resolve(document, selector)?
        .into_iter()
        .map(|r| stringify(r.value, options.identifier_style))
        .collect())
}

/// Canonical text for one identifier value.
///
/// Strings are used verbatim; other scalars use their JSON text.
pub fn stringify(value: &Value, style: IdentifierStyle) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) if style == IdentifierStyle::Sha256 => {
            fingerprint_value(value)
        }
        other => other.to_string(),
    }
}
