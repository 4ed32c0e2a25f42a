use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_CONFIG_V1: &str = "jsongate.config.v1";

/// `jsongate.toml` schema v1.
///
/// Every key is optional; an empty file resolves to the defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JsongateConfigV1 {
    /// Optional schema string for tooling (`jsongate.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Maximum rules evaluated concurrently. `0` sizes the pool to the CPU count, `1` runs inline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_parallelism: Option<usize>,

    /// Identifier reported for rules without an identifier selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_default: Option<String>,

    /// How object/array identifiers are rendered: `json` (default) or `sha256`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_style: Option<String>,

    /// When to fail a scan: `fail` (default, violations or errors) or `error` (errors only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// Evaluation deadline in milliseconds. `0` means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}
