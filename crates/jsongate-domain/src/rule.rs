//! One rule against one resource: match, exclude, identify, then assert per identifier.

use crate::condition::{self, Mode};
use crate::context::EvalContext;
use crate::identifier::resolve_identifiers;
use crate::model::Rule;
use crate::options::EngineOptions;
use jsongate_types::{EvalError, RuleResult};
use serde_json::Value;
use tracing::debug;

/// Evaluate `rule` of `policy` against `resource`.
///
/// Returns no results when the rule does not apply or identifies nothing. An error before the
/// assert phase yields a single errored result under the default identifier; an error during
/// assert is recorded on that identifier's result only.
pub fn evaluate_rule(
    policy: &str,
    rule: &Rule,
    resource: &Value,
    options: &EngineOptions,
    ctx: &EvalContext,
) -> Vec<RuleResult> {
    let identifiers = match applicable_identifiers(rule, resource, options, ctx) {
        Ok(ids) => ids,
        Err(err) => {
            return vec![RuleResult::errored(
                policy,
                &rule.name,
                &options.identifier_default,
                err,
            )];
        }
    };

    identifiers
        .into_iter()
        .map(|identifier| {
            let result = match condition::evaluate(resource, &rule.assert, Mode::Assert, ctx) {
                Ok(out) if out.satisfied => RuleResult::pass(policy, &rule.name, identifier),
                Ok(out) => RuleResult::fail(policy, &rule.name, identifier, out.violations),
                Err(err) => RuleResult::errored(policy, &rule.name, identifier, err),
            };
            debug!(
                policy,
                rule = %rule.name,
                identifier = %result.identifier,
                outcome = result.outcome().as_str(),
                "rule evaluated"
            );
            result
        })
        .collect()
}

fn applicable_identifiers(
    rule: &Rule,
    resource: &Value,
    options: &EngineOptions,
    ctx: &EvalContext,
) -> Result<Vec<String>, EvalError> {
    ctx.check()?;

    if let Some(tree) = &rule.match_tree
        && !condition::evaluate(resource, tree, Mode::Match, ctx)?.satisfied
    {
        debug!(rule = %rule.name, "rule does not match");
        return Ok(Vec::new());
    }

    if let Some(tree) = &rule.exclude
        && condition::evaluate(resource, tree, Mode::Match, ctx)?.satisfied
    {
        debug!(rule = %rule.name, "rule excluded");
        return Ok(Vec::new());
    }

    resolve_identifiers(resource, rule.identifier.as_ref(), options)
}
