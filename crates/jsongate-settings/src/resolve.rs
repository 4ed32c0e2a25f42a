use crate::model::{JsongateConfigV1, SCHEMA_CONFIG_V1};
use anyhow::Context;
use jsongate_domain::{EngineOptions, FailOn, IdentifierStyle};
use std::time::Duration;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub max_parallelism: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub fail_on: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    pub options: EngineOptions,
    pub fail_on: FailOn,
    pub timeout: Option<Duration>,
}

pub fn resolve_config(
    cfg: JsongateConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }

    let mut options = EngineOptions::default();
    if let Some(n) = overrides.max_parallelism.or(cfg.max_parallelism) {
        options.max_parallelism = n;
    }
    if let Some(default) = cfg.identifier_default {
        options.identifier_default = default;
    }
    if let Some(style) = cfg.identifier_style.as_deref() {
        options.identifier_style =
            parse_identifier_style(style).context("invalid identifier_style")?;
    }

    let fail_on = match overrides.fail_on.as_deref().or(cfg.fail_on.as_deref()) {
        Some(v) => parse_fail_on(v).context("invalid fail_on")?,
        None => FailOn::default(),
    };

    let timeout = overrides
        .timeout_ms
        .or(cfg.timeout_ms)
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis);

    Ok(ResolvedConfig {
        options,
        fail_on,
        timeout,
    })
}

fn parse_identifier_style(v: &str) -> anyhow::Result<IdentifierStyle> {
    match v {
        "json" => Ok(IdentifierStyle::Json),
        "sha256" => Ok(IdentifierStyle::Sha256),
        other => anyhow::bail!("unknown identifier style: {other} (expected json|sha256)"),
    }
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "fail" => Ok(FailOn::Fail),
        "error" => Ok(FailOn::Error),
        other => anyhow::bail!("unknown fail_on: {other} (expected fail|error)"),
    }
}
