//! Wire shape of a policy document.
//!
//! Fields are optional at this level so missing ones are reported with the policy context
//! instead of a bare serde message.

use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PolicyDocument {
    pub api_version: Option<String>,
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
    pub spec: Option<PolicySpec>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct Metadata {
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct PolicySpec {
    pub rules: Option<Vec<RuleDocument>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct RuleDocument {
    pub name: Option<String>,
    pub identifier: Option<String>,
    #[serde(rename = "match")]
    pub match_tree: Option<Value>,
    pub exclude: Option<Value>,
    pub assert: Option<Value>,
}
