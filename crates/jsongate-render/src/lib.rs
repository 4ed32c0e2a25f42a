//! Rendering for human surfaces (log lines, Markdown).

#![forbid(unsafe_code)]

mod markdown;
mod text;

pub use markdown::render_markdown;
pub use text::{render_rule_result, render_text, result_details};
