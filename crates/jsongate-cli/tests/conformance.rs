//! Conformance tests for jsongate reports.
//!
//! These tests validate:
//! 1. Every fixture's JSON report validates against the `ReportEnvelope` schema
//! 2. Counts and verdict agree with the rule results they summarise
//! 3. Results appear in policy order, then rule declaration order

use assert_cmd::Command;
use jsongate_types::{ReportEnvelope, SCHEMA_REPORT_V1};
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn jsongate_cmd() -> Command {
    Command::cargo_bin("jsongate").expect("jsongate binary not found")
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("jsongate-cli should have parent")
        .parent()
        .expect("crates should have parent")
        .join("tests")
        .join("fixtures")
}

fn fixture_names() -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(fixtures_dir())
        .expect("read fixtures dir")
        .filter_map(Result::ok)
        .filter(|e| e.path().join("policy.yaml").exists())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn json_report(fixture: &str) -> Value {
    let dir = fixtures_dir().join(fixture);
    let temp = TempDir::new().expect("temp dir");
    let output = jsongate_cmd()
        .current_dir(temp.path())
        .arg("scan")
        .arg("--policy")
        .arg(dir.join("policy.yaml"))
        .arg("--payload")
        .arg(dir.join("payload.json"))
        .args(["--format", "json"])
        .output()
        .expect("run jsongate");
    assert_ne!(
        output.status.code(),
        Some(1),
        "fixture `{fixture}` hit a runtime error: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("report is JSON")
}

fn report_validator() -> jsonschema::Validator {
    let schema = serde_json::to_value(schemars::schema_for!(ReportEnvelope)).expect("schema json");
    jsonschema::validator_for(&schema).expect("report schema compiles")
}

#[test]
fn fixture_reports_validate_against_schema() {
    let validator = report_validator();
    let mut errors = Vec::new();

    for name in fixture_names() {
        let report = json_report(&name);
        for err in validator.iter_errors(&report) {
            errors.push(format!("{name}: {err}"));
        }
    }

    assert!(errors.is_empty(), "schema violations:\n{}", errors.join("\n"));
}

#[test]
fn fixture_reports_deserialize_into_the_envelope() {
    for name in fixture_names() {
        let report: ReportEnvelope =
            serde_json::from_value(json_report(&name)).expect("report deserializes");
        assert_eq!(report.schema, SCHEMA_REPORT_V1, "fixture `{name}`");
        assert_eq!(report.tool.name, "jsongate");
        assert!(report.finished_at >= report.started_at);
    }
}

#[test]
fn counts_and_verdict_agree_with_results() {
    for name in fixture_names() {
        let report: ReportEnvelope =
            serde_json::from_value(json_report(&name)).expect("report deserializes");

        let (mut pass, mut fail, mut error) = (0, 0, 0);
        for result in report.response.rule_results() {
            match result.outcome().as_str() {
                "pass" => pass += 1,
                "fail" => fail += 1,
                _ => error += 1,
            }
        }
        assert_eq!(report.counts.pass, pass, "fixture `{name}`");
        assert_eq!(report.counts.fail, fail, "fixture `{name}`");
        assert_eq!(report.counts.error, error, "fixture `{name}`");

        let expected = if error > 0 {
            "error"
        } else if fail > 0 {
            "fail"
        } else {
            "pass"
        };
        let verdict = serde_json::to_value(report.verdict).expect("verdict json");
        assert_eq!(verdict, expected, "fixture `{name}`");
    }
}

#[test]
fn results_follow_rule_declaration_order() {
    let report = json_report("path_type_error");
    let rules: Vec<&str> = report["response"]["policies"][0]["rules"]
        .as_array()
        .expect("rules array")
        .iter()
        .map(|r| r["rule"].as_str().expect("rule name"))
        .collect();
    assert_eq!(rules, vec!["deep-field", "has-name"]);
}

#[test]
fn errored_results_carry_a_typed_error() {
    let report = json_report("path_type_error");
    let errored = &report["response"]["policies"][0]["rules"][0];
    assert_eq!(errored["error"]["kind"], "path_type");
    assert_eq!(errored["error"]["path"], "input.nonexistent");
    assert_eq!(errored["error"]["found"], "string");
    assert!(errored.get("violations").is_none());
}

#[test]
fn skipped_rules_leave_an_empty_policy_result() {
    let report = json_report("get_skipped");
    let policies = report["response"]["policies"].as_array().expect("policies");
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0]["policy"], "authz");
    assert_eq!(policies[0]["rules"], serde_json::json!([]));
}
