use anyhow::Context;
use jsongate_types::{ReportEnvelope, SCHEMA_REPORT_V1};

pub fn parse_report_json(text: &str) -> anyhow::Result<ReportEnvelope> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse jsongate report")
}

pub fn serialize_report(report: &ReportEnvelope) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}
