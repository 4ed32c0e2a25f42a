//! CLI entry point for jsongate.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup and exit
//! codes. All business logic lives in the `jsongate-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use jsongate_app::{
    PolicySource, ScanInput, format_validation, parse_report_json, render_markdown, render_text,
    run_scan, run_validate, serialize_report, verdict_exit_code,
};
use jsongate_settings::Overrides;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "JSONGATE_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "jsongate",
    version,
    about = "Evaluate JSON payloads against declarative policies"
)]
struct Cli {
    /// Path to jsongate config TOML. A missing file means defaults.
    #[arg(long, default_value = "jsongate.toml", global = true)]
    config: Utf8PathBuf,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate policies against a payload.
    Scan {
        /// Policy file (YAML or JSON). Repeat for several files.
        #[arg(long = "policy", required = true)]
        policies: Vec<Utf8PathBuf>,

        /// Payload file (JSON or YAML).
        #[arg(long)]
        payload: Utf8PathBuf,

        /// Override max_parallelism (0 = CPU count, 1 = sequential).
        #[arg(long)]
        max_parallelism: Option<usize>,

        /// Override timeout_ms (0 = no deadline).
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Override fail_on (fail|error).
        #[arg(long)]
        fail_on: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Where to write the output (stdout if not specified).
        #[arg(long, short)]
        out: Option<Utf8PathBuf>,
    },

    /// Render Markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long)]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (stdout if not specified).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Load policies and report what was found, without evaluating anything.
    Validate {
        #[arg(long = "policy", required = true)]
        policies: Vec<Utf8PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Markdown,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.cmd {
        Commands::Scan {
            policies,
            payload,
            max_parallelism,
            timeout_ms,
            fail_on,
            format,
            out,
        } => cmd_scan(
            &cli.config,
            &policies,
            &payload,
            Overrides {
                max_parallelism,
                timeout_ms,
                fail_on,
            },
            format,
            out.as_deref(),
        ),
        Commands::Md { report, output } => cmd_md(&report, output.as_deref()).map(|()| 0),
        Commands::Validate { policies } => cmd_validate(&policies).map(|()| 0),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("jsongate error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_scan(
    config: &Utf8Path,
    policy_paths: &[Utf8PathBuf],
    payload_path: &Utf8Path,
    overrides: Overrides,
    format: Format,
    out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    debug!(policies = policy_paths.len(), payload = %payload_path, ?format, "scan requested");

    // Missing config is allowed (defaults apply).
    let config_text = std::fs::read_to_string(config).unwrap_or_default();
    let texts = read_all(policy_paths)?;
    let payload_text = std::fs::read_to_string(payload_path)
        .with_context(|| format!("read payload: {payload_path}"))?;

    let output = run_scan(ScanInput {
        policies: sources(policy_paths, &texts),
        payload_text: &payload_text,
        config_text: &config_text,
        overrides,
    })?;

    let rendered = match format {
        Format::Text => render_text(&output.report).into_bytes(),
        Format::Json => serialize_report(&output.report)?,
        Format::Markdown => render_markdown(&output.report).into_bytes(),
    };
    emit(out, &rendered)?;

    Ok(verdict_exit_code(
        output.report.verdict,
        output.resolved_config.fail_on,
    ))
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;
    emit(output, render_markdown(&report).as_bytes())
}

fn cmd_validate(policy_paths: &[Utf8PathBuf]) -> anyhow::Result<()> {
    let texts = read_all(policy_paths)?;
    let output = run_validate(&sources(policy_paths, &texts))?;
    print!("{}", format_validation(&output));
    Ok(())
}

fn read_all(paths: &[Utf8PathBuf]) -> anyhow::Result<Vec<String>> {
    paths
        .iter()
        .map(|path| {
            std::fs::read_to_string(path).with_context(|| format!("read policy: {path}"))
        })
        .collect()
}

fn sources<'a>(paths: &'a [Utf8PathBuf], texts: &'a [String]) -> Vec<PolicySource<'a>> {
    paths
        .iter()
        .zip(texts)
        .map(|(path, text)| PolicySource {
            origin: path,
            text,
        })
        .collect()
}

fn emit(out: Option<&Utf8Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create directory: {parent}"))?;
            }
            std::fs::write(path, bytes).with_context(|| format!("write output: {path}"))
        }
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("write stdout")?;
            stdout.flush().context("flush stdout")
        }
    }
}
