//! Developer tasks (schema generation, fixture conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Project root (parent of the xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("determine current directory")?,
    };

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .context("xtask has no parent directory")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(jsongate_types::ReportEnvelope)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(jsongate_settings::JsongateConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "jsongate.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "jsongate.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Pretty-printed JSON with a trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("write schema {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that the checked-in schemas match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("schema validation failed")
}

/// Run the built binary on every fixture and validate each JSON report against the report
/// schema. Fixtures are directories under `tests/fixtures/` holding `policy.yaml` and
/// `payload.json`.
fn conform() -> anyhow::Result<()> {
    let root = project_root()?;
    let schema = serde_json::to_value(generate_report_schema()).context("report schema json")?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("compile report schema: {e}"))?;
    println!("✓ jsongate.report.v1 schema compiles");

    let bin = root.join("target").join("debug").join("jsongate");
    #[cfg(target_os = "windows")]
    let bin = bin.with_extension("exe");

    if !bin.exists() {
        bail!(
            "jsongate binary not found at {}.\nRun `cargo build -p jsongate-cli` first.",
            bin.display()
        );
    }

    let fixtures = root.join("tests").join("fixtures");
    let mut entries: Vec<PathBuf> = fs::read_dir(&fixtures)
        .with_context(|| format!("read {}", fixtures.display()))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.join("policy.yaml").exists() && p.join("payload.json").exists())
        .collect();
    entries.sort();

    let mut errors = Vec::new();
    for dir in &entries {
        let name = dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let temp = tempfile::tempdir().context("create temp dir")?;
        let report_out = temp.path().join("report.json");

        let output = std::process::Command::new(&bin)
            .current_dir(temp.path())
            .arg("scan")
            .arg("--policy")
            .arg(dir.join("policy.yaml"))
            .arg("--payload")
            .arg(dir.join("payload.json"))
            .args(["--format", "json", "--out"])
            .arg(&report_out)
            .output()
            .with_context(|| format!("run jsongate on fixture '{name}'"))?;

        // 0 and 2 both produce a report; 1 means the scan never ran.
        if output.status.code() == Some(1) {
            errors.push(format!(
                "fixture '{name}': runtime error: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
            continue;
        }

        let text = fs::read_to_string(&report_out)
            .with_context(|| format!("read report for fixture '{name}'"))?;
        let report: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("parse report for fixture '{name}'"))?;

        let before = errors.len();
        for err in validator.iter_errors(&report) {
            errors.push(format!("fixture '{name}': schema validation: {err}"));
        }
        if report.get("schema").and_then(|v| v.as_str()) != Some(jsongate_types::SCHEMA_REPORT_V1)
        {
            errors.push(format!("fixture '{name}': unexpected schema id"));
        }
        if errors.len() == before {
            println!("  ✓ fixture '{name}' validates");
        }
    }

    if entries.is_empty() {
        bail!("no fixtures found in {}", fixtures.display());
    }
    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("conformance failed with {} errors", errors.len());
    }

    println!("\n✓ All {} fixtures pass conformance checks!", entries.len());
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Run jsongate on tests/fixtures and validate every report");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(String::as_str).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
