use crate::EvalError;
use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// Evidence of one failed assertion: where it failed, what was expected and what was found.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    /// Selector of the failing check, or `any` / `none` for an aggregated block.
    pub selector: String,

    /// Concrete path of the offending value, when one was resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    pub expected: JsonValue,

    /// `None` when the selector resolved to nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = self.path.as_deref().unwrap_or(&self.selector);
        if let Some(message) = &self.message {
            write!(f, "{message} (")?;
        }
        match &self.actual {
            Some(actual) => write!(f, "{at}: expected {}, found {actual}", self.expected)?,
            None => write!(f, "{at}: expected {}, found nothing", self.expected)?,
        }
        if self.message.is_some() {
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// The three-way outcome every consumer branches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Pass => ids::OUTCOME_PASS,
            Outcome::Fail => ids::OUTCOME_FAIL,
            Outcome::Error => ids::OUTCOME_ERROR,
        }
    }
}

/// Result of one (rule, identifier) evaluation.
///
/// Carries either nothing (pass), violations (fail), or an error; never both violations
/// and an error. The constructors are the only way to build one, and deserialization
/// rejects input that carries both.
#[derive(Clone, Debug, PartialEq, Serialize, JsonSchema)]
pub struct RuleResult {
    pub policy: String,
    pub rule: String,
    pub identifier: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    violations: Vec<Violation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<EvalError>,
}

impl RuleResult {
    pub fn pass(
        policy: impl Into<String>,
        rule: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            policy: policy.into(),
            rule: rule.into(),
            identifier: identifier.into(),
            violations: Vec::new(),
            error: None,
        }
    }

    /// A failing result. An empty `violations` list yields a pass.
    pub fn fail(
        policy: impl Into<String>,
        rule: impl Into<String>,
        identifier: impl Into<String>,
        violations: Vec<Violation>,
    ) -> Self {
        Self {
            violations,
            ..Self::pass(policy, rule, identifier)
        }
    }

    pub fn errored(
        policy: impl Into<String>,
        rule: impl Into<String>,
        identifier: impl Into<String>,
        error: EvalError,
    ) -> Self {
        Self {
            error: Some(error),
            ..Self::pass(policy, rule, identifier)
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn error(&self) -> Option<&EvalError> {
        self.error.as_ref()
    }

    pub fn outcome(&self) -> Outcome {
        if self.error.is_some() {
            Outcome::Error
        } else if !self.violations.is_empty() {
            Outcome::Fail
        } else {
            Outcome::Pass
        }
    }
}

#[derive(Deserialize)]
struct RawRuleResult {
    policy: String,
    rule: String,
    identifier: String,
    #[serde(default)]
    violations: Vec<Violation>,
    #[serde(default)]
    error: Option<EvalError>,
}

impl<'de> Deserialize<'de> for RuleResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawRuleResult::deserialize(deserializer)?;
        match raw.error {
            Some(_) if !raw.violations.is_empty() => Err(serde::de::Error::custom(format!(
                "rule result {}/{} -> {} carries both violations and an error",
                raw.policy, raw.rule, raw.identifier
            ))),
            Some(error) => Ok(RuleResult::errored(raw.policy, raw.rule, raw.identifier, error)),
            None => Ok(RuleResult::fail(
                raw.policy,
                raw.rule,
                raw.identifier,
                raw.violations,
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyResult {
    pub policy: String,
    /// Rule declaration order, then identifier order within a rule.
    pub rules: Vec<RuleResult>,
}

/// One `PolicyResult` per evaluated policy, in request order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Response {
    pub policies: Vec<PolicyResult>,
}

impl Response {
    /// Every rule result, flattened in response order.
    pub fn rule_results(&self) -> impl Iterator<Item = &RuleResult> {
        self.policies.iter().flat_map(|p| p.rules.iter())
    }
}
