use jsongate_types::{Outcome, Response, RuleResult};

/// One line per rule result, in response order.
pub fn render_text(response: &Response) -> Vec<String> {
    response.rule_results().map(render_rule_result).collect()
}

/// `pass: <policy>/<rule> -> <id>`, `fail: ... -> <id>: <violations>` or
/// `error: ... -> <id>: <error>`.
pub fn render_rule_result(result: &RuleResult) -> String {
    let head = format!(
        "{}: {}/{} -> {}",
        result.outcome().as_str(),
        result.policy,
        result.rule,
        result.identifier
    );
    match result_details(result) {
        Some(details) => format!("{head}: {details}"),
        None => head,
    }
}

/// The error, or the violations joined by `; `. `None` for a pass.
pub fn result_details(result: &RuleResult) -> Option<String> {
    match (result.outcome(), result.error()) {
        (Outcome::Error, Some(err)) => Some(err.to_string()),
        (Outcome::Fail, _) => {
            let violations: Vec<String> =
                result.violations().iter().map(ToString::to_string).collect();
            Some(violations.join("; "))
        }
        _ => None,
    }
}
