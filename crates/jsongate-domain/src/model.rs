use crate::condition::Condition;
use crate::pattern::Pattern;
use crate::selector::Selector;
use serde_json::Value;
use std::sync::Arc;

/// A leaf check: the values at `selector` must satisfy `pattern`.
#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    pub selector: Selector,
    pub pattern: Pattern,
    /// Reported with the violation when the check fails.
    pub message: Option<String>,
}

impl Predicate {
    pub fn new(selector: Selector, pattern: Pattern) -> Self {
        Self {
            selector,
            pattern,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub name: String,

    /// `None` means "no identifier": one result labelled with the configured default.
    pub identifier: Option<Selector>,

    /// `None` means the rule always applies.
    pub match_tree: Option<Condition>,

    /// When present and satisfied, the rule does not apply.
    pub exclude: Option<Condition>,

    pub assert: Condition,
}

impl Rule {
    pub fn new(name: impl Into<String>, assert: Condition) -> Self {
        Self {
            name: name.into(),
            identifier: None,
            match_tree: None,
            exclude: None,
            assert,
        }
    }
}

/// An immutable, named, ordered set of rules.
#[derive(Clone, Debug, PartialEq)]
pub struct Policy {
    pub name: String,
    pub rules: Vec<Rule>,
}

/// One evaluation request: a resource and the policies to apply to it, in order.
///
/// Policies are shared read-only across requests and worker threads.
#[derive(Clone, Debug)]
pub struct Request {
    pub resource: Value,
    pub policies: Vec<Arc<Policy>>,
}

impl Request {
    pub fn new(resource: Value, policies: Vec<Arc<Policy>>) -> Self {
        Self {
            resource,
            policies,
        }
    }
}
