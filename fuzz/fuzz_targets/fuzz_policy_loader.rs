//! Fuzz target for policy loading and evaluation.
//!
//! Goal: loading arbitrary policy text and evaluating it against an arbitrary payload should
//! **never panic**. Load failures are errors; evaluation failures become errored results.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_loader
//! ```

#![no_main]

use arbitrary::Arbitrary;
use jsongate_domain::{Engine, EngineOptions, EvalContext, Request};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Arbitrary, Debug)]
struct Input {
    policy: String,
    payload: String,
}

fuzz_target!(|input: Input| {
    let Ok(policies) = jsongate_loader::parse_policies(&input.policy) else {
        return;
    };
    let Ok(resource) = jsongate_loader::parse_payload(&input.payload) else {
        return;
    };

    let options = EngineOptions {
        max_parallelism: 1,
        ..EngineOptions::default()
    };
    let Ok(engine) = Engine::new(options) else {
        return;
    };
    let request = Request::new(resource, policies.into_iter().map(Arc::new).collect());
    let response = engine.run(&EvalContext::background(), &request);
    assert_eq!(response.policies.len(), request.policies.len());
});
