//! Use case orchestration for jsongate.
//!
//! This crate coordinates the loader, settings, domain and render layers. The CLI crate depends
//! on it and only handles argument parsing, file IO and exit codes.

#![forbid(unsafe_code)]

mod render;
mod report;
mod scan;
mod validate;

pub use render::{render_markdown, render_text};
pub use report::{parse_report_json, serialize_report};
pub use scan::{PolicySource, ScanInput, ScanOutput, run_scan, verdict_exit_code};
pub use validate::{PolicySummary, ValidateOutput, format_validation, run_validate};
