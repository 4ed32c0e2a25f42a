use crate::condition::Condition;
use crate::model::{Policy, Predicate, Rule};
use crate::pattern::Pattern;
use crate::selector::Selector;
use serde_json::Value;

pub fn sel(s: &str) -> Selector {
    Selector::parse(s).expect("valid selector")
}

pub fn leaf_predicate(selector: &str, expected: Value) -> Predicate {
    Predicate::new(
        sel(selector),
        Pattern::from_value(&expected).expect("valid pattern"),
    )
}

pub fn leaf(selector: &str, expected: Value) -> Condition {
    Condition::Leaf(leaf_predicate(selector, expected))
}

pub fn policy_of(name: &str, rules: Vec<Rule>) -> Policy {
    Policy {
        name: name.to_string(),
        rules,
    }
}

/// Deny DELETE unless the caller is an admin, labelled by caller name.
pub fn delete_checks_rule() -> Rule {
    Rule {
        name: "delete-checks".to_string(),
        identifier: Some(sel("name")),
        match_tree: Some(Condition::All(vec![leaf(
            "input.method",
            Value::String("DELETE".to_string()),
        )])),
        exclude: None,
        assert: Condition::All(vec![leaf("role", Value::String("admin".to_string()))]),
    }
}

pub fn delete_checks_policy() -> Policy {
    policy_of("delete-checks", vec![delete_checks_rule()])
}
