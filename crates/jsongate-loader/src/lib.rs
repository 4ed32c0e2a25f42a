//! Policy document decoding.
//!
//! Turns YAML (one or more `---` separated documents) or JSON text into validated
//! [`Policy`] values. IO-free: callers read files and hand over strings.

#![forbid(unsafe_code)]

mod document;
mod error;
mod tree;

pub use error::{LoadError, TreeError};

use document::{PolicyDocument, RuleDocument};
use jsongate_domain::{Policy, Rule, Selector};
use jsongate_types::ids;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// Parse every policy in `text`.
///
/// A document holding a list is read as a list of policies. Empty documents are skipped.
pub fn parse_policies(text: &str) -> Result<Vec<Policy>, LoadError> {
    let mut policies = Vec::new();
    for (index, document) in serde_yaml::Deserializer::from_str(text).enumerate() {
        match Value::deserialize(document).map_err(LoadError::Syntax)? {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    policies.push(decode_policy(index, item)?);
                }
            }
            value => policies.push(decode_policy(index, value)?),
        }
    }
    ensure_unique_policy_names(&policies)?;
    Ok(policies)
}

pub fn ensure_unique_policy_names(policies: &[Policy]) -> Result<(), LoadError> {
    let mut seen = BTreeSet::new();
    for policy in policies {
        if !seen.insert(policy.name.as_str()) {
            return Err(LoadError::DuplicatePolicy {
                name: policy.name.clone(),
            });
        }
    }
    Ok(())
}

/// Decode a resource payload: JSON, or YAML as a fallback.
pub fn parse_payload(text: &str) -> Result<Value, LoadError> {
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }
    serde_yaml::from_str(text).map_err(LoadError::Payload)
}

fn decode_policy(index: usize, value: Value) -> Result<Policy, LoadError> {
    let doc: PolicyDocument =
        serde_json::from_value(value).map_err(|source| LoadError::Shape { index, source })?;

    let api_version = non_empty(doc.api_version).ok_or(LoadError::MissingField {
        index,
        field: "apiVersion",
    })?;
    let name = non_empty(doc.metadata.name).ok_or(LoadError::MissingField {
        index,
        field: "metadata.name",
    })?;
    let kind = non_empty(doc.kind).ok_or(LoadError::MissingField {
        index,
        field: "kind",
    })?;
    if kind != ids::KIND_VALIDATING_POLICY {
        return Err(LoadError::UnsupportedKind {
            policy: name,
            kind,
            expected: ids::KIND_VALIDATING_POLICY,
        });
    }
    let rule_docs = doc
        .spec
        .and_then(|spec| spec.rules)
        .ok_or(LoadError::MissingField {
            index,
            field: "spec.rules",
        })?;

    let mut rules = Vec::with_capacity(rule_docs.len());
    let mut seen = BTreeSet::new();
    for (rule_index, rule_doc) in rule_docs.into_iter().enumerate() {
        let rule = decode_rule(&name, rule_index, rule_doc)?;
        if !seen.insert(rule.name.clone()) {
            return Err(LoadError::DuplicateRule {
                policy: name,
                rule: rule.name,
            });
        }
        rules.push(rule);
    }

    debug!(policy = %name, api_version = %api_version, rules = rules.len(), "policy loaded");
    Ok(Policy { name, rules })
}

fn decode_rule(policy: &str, index: usize, doc: RuleDocument) -> Result<Rule, LoadError> {
    let missing = |field| LoadError::MissingRuleField {
        policy: policy.to_string(),
        index,
        field,
    };
    let name = non_empty(doc.name).ok_or_else(|| missing("name"))?;
    let assert = doc.assert.ok_or_else(|| missing("assert"))?;

    let identifier = match non_empty(doc.identifier) {
        Some(text) => Some(Selector::parse(&text).map_err(|source| LoadError::Identifier {
            policy: policy.to_string(),
            rule: name.clone(),
            source,
        })?),
        None => None,
    };

    let tree = |block: &'static str, value: &Value| {
        tree::decode_node(value).map_err(|source| LoadError::Tree {
            policy: policy.to_string(),
            rule: name.clone(),
            block,
            source,
        })
    };
    let match_tree = doc.match_tree.as_ref().map(|v| tree("match", v)).transpose()?;
    let exclude = doc.exclude.as_ref().map(|v| tree("exclude", v)).transpose()?;
    let assert = tree("assert", &assert)?;

    Ok(Rule {
        name,
        identifier,
        match_tree,
        exclude,
        assert,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsongate_domain::{Condition, Segment};
    use serde_json::json;

    const AUTHZ: &str = r#"
apiVersion: json.jsongate.io/v1alpha1
kind: ValidatingPolicy
metadata:
  name: authz
spec:
  rules:
  - name: delete-checks
    identifier: "name"
    match:
      all:
        (input.method): "DELETE"
    assert:
      all:
      - check:
          role: "admin"
"#;

    #[test]
    fn parses_the_authz_policy() {
        let policies = parse_policies(AUTHZ).expect("parses");
        assert_eq!(policies.len(), 1);
        let policy = &policies[0];
        assert_eq!(policy.name, "authz");
        assert_eq!(policy.rules.len(), 1);

        let rule = &policy.rules[0];
        assert_eq!(rule.name, "delete-checks");
        assert_eq!(rule.identifier.as_ref().map(Selector::as_str), Some("name"));
        assert!(rule.exclude.is_none());
        assert!(matches!(&rule.assert, Condition::All(blocks) if blocks.len() == 1));

        let Some(Condition::All(children)) = &rule.match_tree else {
            panic!("expected an all block");
        };
        let Condition::All(leaves) = &children[0] else {
            panic!("expected leaf mapping");
        };
        let Condition::Leaf(predicate) = &leaves[0] else {
            panic!("expected leaf");
        };
        assert_eq!(
            predicate.selector.segments(),
            &[
                Segment::Field("input".to_string()),
                Segment::Field("method".to_string())
            ]
        );
        assert_eq!(predicate.pattern.to_value(), json!("DELETE"));
    }

    #[test]
    fn parses_multiple_documents_and_skips_empty_ones() {
        let text = format!("{AUTHZ}\n---\n---\n{}", AUTHZ.replace("name: authz", "name: other"));
        let policies = parse_policies(&text).expect("parses");
        let names: Vec<_> = policies.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["authz", "other"]);
        assert!(parse_policies("").expect("empty").is_empty());
    }

    #[test]
    fn parses_json_policies() {
        let text = json!([{
            "apiVersion": "v1",
            "kind": "ValidatingPolicy",
            "metadata": {"name": "json-policy"},
            "spec": {"rules": [{"name": "r", "assert": {"role": "admin"}}]}
        }])
        .to_string();
        let policies = parse_policies(&text).expect("parses");
        assert_eq!(policies[0].name, "json-policy");
        assert!(policies[0].rules[0].identifier.is_none());
        assert!(policies[0].rules[0].match_tree.is_none());
    }

    #[test]
    fn rejects_invalid_documents() {
        let without_kind = AUTHZ.replace("kind: ValidatingPolicy\n", "");
        assert!(matches!(
            parse_policies(&without_kind),
            Err(LoadError::MissingField { field: "kind", .. })
        ));

        let wrong_kind = AUTHZ.replace("kind: ValidatingPolicy", "kind: MutatingPolicy");
        assert!(matches!(
            parse_policies(&wrong_kind),
            Err(LoadError::UnsupportedKind { .. })
        ));

        let without_assert = AUTHZ.replace("assert:", "verify:");
        assert!(matches!(
            parse_policies(&without_assert),
            Err(LoadError::MissingRuleField { field: "assert", .. })
        ));

        let bad_identifier = AUTHZ.replace(r#"identifier: "name""#, r#"identifier: "name[""#);
        assert!(matches!(
            parse_policies(&bad_identifier),
            Err(LoadError::Identifier { .. })
        ));

        let bad_tree = AUTHZ.replace("(input.method)", "(input..method)");
        assert!(matches!(
            parse_policies(&bad_tree),
            Err(LoadError::Tree { block: "match", .. })
        ));

        assert!(matches!(
            parse_policies("key: [unterminated"),
            Err(LoadError::Syntax(_))
        ));
        assert!(matches!(
            parse_policies("just a string"),
            Err(LoadError::Shape { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_names() {
        let twice = format!("{AUTHZ}\n---\n{AUTHZ}");
        assert!(matches!(
            parse_policies(&twice),
            Err(LoadError::DuplicatePolicy { name }) if name == "authz"
        ));

        let rules_twice = AUTHZ.replace(
            "  rules:\n",
            "  rules:\n  - name: delete-checks\n    assert: {}\n",
        );
        assert!(matches!(
            parse_policies(&rules_twice),
            Err(LoadError::DuplicateRule { .. })
        ));
    }

    #[test]
    fn payload_accepts_json_and_yaml() {
        assert_eq!(
            parse_payload(r#"{"name": "Annie"}"#).expect("json"),
            json!({"name": "Annie"})
        );
        assert_eq!(
            parse_payload("name: Annie\nrole: admin\n").expect("yaml"),
            json!({"name": "Annie", "role": "admin"})
        );
        assert!(parse_payload("{unbalanced").is_err());
    }
}
