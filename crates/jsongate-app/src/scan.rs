//! The `scan` use case: evaluate policies against one payload and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use jsongate_domain::report::verdict_fails;
use jsongate_domain::{Engine, EvalContext, FailOn, Policy, Request, Summary};
use jsongate_settings::{JsongateConfigV1, Overrides, ResolvedConfig};
use jsongate_types::{ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, Verdict};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;

/// Policy text and where it came from (used in error context).
#[derive(Clone, Debug)]
pub struct PolicySource<'a> {
    pub origin: &'a Utf8Path,
    pub text: &'a str,
}

#[derive(Clone, Debug)]
pub struct ScanInput<'a> {
    pub policies: Vec<PolicySource<'a>>,
    /// Resource document, JSON or YAML.
    pub payload_text: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
}

#[derive(Clone, Debug)]
pub struct ScanOutput {
    pub report: ReportEnvelope,
    pub resolved_config: ResolvedConfig,
}

/// Parse config, load policies, decode the payload, evaluate, and build the report.
pub fn run_scan(input: ScanInput<'_>) -> anyhow::Result<ScanOutput> {
    let started_at = OffsetDateTime::now_utc();

    let cfg = if input.config_text.trim().is_empty() {
        JsongateConfigV1::default()
    } else {
        jsongate_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved = jsongate_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let policies = load_sources(&input.policies)?;
    let resource = jsongate_loader::parse_payload(input.payload_text).context("parse payload")?;

    let engine = Engine::new(resolved.options.clone()).context("start engine")?;
    let ctx = match resolved.timeout {
        Some(timeout) => EvalContext::with_timeout(timeout),
        None => EvalContext::background(),
    };
    let request = Request::new(resource, policies.into_iter().map(Arc::new).collect());
    let response = engine.run(&ctx, &request);
    let summary = Summary::of(&response);

    info!(
        verdict = ?summary.verdict,
        pass = summary.counts.pass,
        fail = summary.counts.fail,
        error = summary.counts.error,
        "scan finished"
    );

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "jsongate".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict: summary.verdict,
        counts: summary.counts,
        response,
    };

    Ok(ScanOutput {
        report,
        resolved_config: resolved,
    })
}

/// Load every source as one set; policy names must be unique across sources.
pub(crate) fn load_sources(sources: &[PolicySource<'_>]) -> anyhow::Result<Vec<Policy>> {
    let mut policies = Vec::new();
    for source in sources {
        let parsed = jsongate_loader::parse_policies(source.text)
            .with_context(|| format!("load policies: {}", source.origin))?;
        policies.extend(parsed);
    }
    jsongate_loader::ensure_unique_policy_names(&policies).context("load policies")?;
    Ok(policies)
}

/// Map verdict to exit code: 0 = passing, 2 = failing under `fail_on`.
pub fn verdict_exit_code(verdict: Verdict, fail_on: FailOn) -> i32 {
    if verdict_fails(verdict, fail_on) { 2 } else { 0 }
}
