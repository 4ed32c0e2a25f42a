//! Fuzz target for selector parsing and resolution.
//!
//! Goal: parsing and resolving a selector should **never panic** on any input.
//! Malformed selectors return errors; traversal mismatches return `PathType` errors.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_selector_parser
//! ```

#![no_main]

use jsongate_domain::Selector;
use jsongate_domain::resolve::resolve;
use libfuzzer_sys::fuzz_target;
use serde_json::json;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(selector) = Selector::parse(text) else {
        return;
    };

    // Reparsing the displayed form must succeed.
    assert!(Selector::parse(&selector.to_string()).is_ok());

    let doc = json!({
        "name": "Annie",
        "input": {"method": "DELETE", "tags": ["a", "b"]},
        "spec": {"containers": [{"name": "web"}, {"name": null}]},
        "nothing": null
    });
    let _ = resolve(&doc, &selector);
});
