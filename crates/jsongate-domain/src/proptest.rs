//! Property-based tests for the evaluation engine.
//!
//! Invariants covered:
//! - absent selectors never satisfy and never error
//! - empty `all` / `any` blocks
//! - determinism across repeated and parallel runs
//! - identifier fan-out cardinality
//! - isolation of erroring rules

use crate::condition::{self, Condition, Mode};
use crate::context::EvalContext;
use crate::engine::Engine;
use crate::model::{Policy, Request, Rule};
use crate::options::EngineOptions;
use crate::predicate;
use crate::test_support::{leaf, leaf_predicate, policy_of, sel};
use jsongate_types::{Outcome, Response};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

const SELECTORS: &[&str] = &["a", "b", "c", "a.b", "a[*]", "b[0]", "[*]", "a.c[*].b"];

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-5i64..5).prop_map(|n| json!(n)),
        "[a-c]{0,2}".prop_map(Value::String),
    ]
}

fn arb_json() -> impl Strategy<Value = Value> {
    arb_scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-c]", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Object documents with keys drawn from `a`..`c`.
fn arb_document() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-c]", arb_json(), 0..4)
        .prop_map(|m| Value::Object(m.into_iter().collect()))
}

fn arb_condition() -> impl Strategy<Value = Condition> {
    let leaf_strategy =
        (prop::sample::select(SELECTORS), arb_scalar()).prop_map(|(s, v)| leaf(s, v));
    leaf_strategy.prop_recursive(2, 12, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Condition::All),
            prop::collection::vec(inner.clone(), 0..3).prop_map(Condition::Any),
            prop::collection::vec(inner, 0..3).prop_map(Condition::None),
        ]
    })
}

fn arb_rules() -> impl Strategy<Value = Vec<Rule>> {
    prop::collection::vec(
        (
            prop::option::of(prop::sample::select(SELECTORS)),
            prop::option::of(arb_condition()),
            arb_condition(),
        ),
        0..6,
    )
    .prop_map(|rules| {
        rules
            .into_iter()
            .enumerate()
            .map(|(i, (identifier, match_tree, assert))| Rule {
                name: format!("r{i}"),
                identifier: identifier.map(sel),
                match_tree,
                exclude: None,
                assert,
            })
            .collect()
    })
}

fn arb_request() -> impl Strategy<Value = Request> {
    (arb_document(), prop::collection::vec(arb_rules(), 1..4)).prop_map(|(doc, policies)| {
        let policies = policies
            .into_iter()
            .enumerate()
            .map(|(i, rules)| Arc::new(policy_of(&format!("p{i}"), rules)))
            .collect();
        Request::new(doc, policies)
    })
}

fn run(request: &Request, max_parallelism: usize) -> Response {
    Engine::new(EngineOptions {
        max_parallelism,
        ..EngineOptions::default()
    })
    .expect("engine")
    .run(&EvalContext::background(), request)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn absent_selector_is_never_satisfied(doc in arb_document(), expected in arb_json()) {
        let out = predicate::evaluate(&doc, &leaf_predicate("zz.missing", expected))
            .expect("absent field never errors");
        prop_assert!(!out.satisfied);
    }

    #[test]
    fn empty_blocks_are_constant(doc in arb_json()) {
        let ctx = EvalContext::background();
        for mode in [Mode::Match, Mode::Assert] {
            let all = condition::evaluate(&doc, &Condition::All(vec![]), mode, &ctx)
                .expect("no leaves");
            prop_assert!(all.satisfied);
            let any = condition::evaluate(&doc, &Condition::Any(vec![]), mode, &ctx)
                .expect("no leaves");
            prop_assert!(!any.satisfied);
        }
    }

    #[test]
    fn repeated_runs_are_byte_identical(request in arb_request()) {
        let first = serde_json::to_vec(&run(&request, 1)).expect("serialize");
        let second = serde_json::to_vec(&run(&request, 1)).expect("serialize");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn parallel_runs_match_sequential(request in arb_request()) {
        let sequential = run(&request, 1);
        prop_assert_eq!(&run(&request, 0), &sequential);
        prop_assert_eq!(&run(&request, 3), &sequential);
    }

    #[test]
    fn every_policy_gets_a_result(request in arb_request()) {
        let response = run(&request, 0);
        let names: Vec<_> = response.policies.iter().map(|p| p.policy.clone()).collect();
        let expected: Vec<_> = request.policies.iter().map(|p| p.name.clone()).collect();
        prop_assert_eq!(names, expected);
        for result in response.rule_results() {
            prop_assert!(result.error().is_none() || result.violations().is_empty());
        }
    }

    #[test]
    fn fan_out_yields_one_result_per_identifier(items in prop::collection::vec(arb_scalar(), 0..8)) {
        let mut rule = Rule::new("fan", leaf("a", json!(1)));
        rule.identifier = Some(sel("items[*]"));
        let request = Request::new(
            json!({"items": items.clone(), "a": 1}),
            vec![Arc::new(policy_of("p", vec![rule]))],
        );
        let response = run(&request, 0);
        let results = &response.policies[0].rules;
        prop_assert_eq!(results.len(), items.len());
        prop_assert!(results.iter().all(|r| r.outcome() == Outcome::Pass));
    }

    #[test]
    fn erroring_rule_does_not_disturb_siblings(request in arb_request()) {
        let mut resource = request.resource.clone();
        if let Value::Object(map) = &mut resource {
            map.insert("zz".to_string(), json!("scalar"));
        }
        let baseline = run(&Request::new(resource.clone(), request.policies.clone()), 0);

        let broken = Rule::new("broken", leaf("zz[0]", json!(1)));
        let policies: Vec<Arc<Policy>> = request
            .policies
            .iter()
            .map(|policy| {
                let mut rules = vec![broken.clone()];
                rules.extend(policy.rules.iter().cloned());
                Arc::new(policy_of(&policy.name, rules))
            })
            .collect();
        let with_broken = run(&Request::new(resource, policies), 0);

        for (before, after) in baseline.policies.iter().zip(&with_broken.policies) {
            prop_assert_eq!(after.rules[0].outcome(), Outcome::Error);
            prop_assert_eq!(&after.rules[1..], before.rules.as_slice());
        }
    }
}
