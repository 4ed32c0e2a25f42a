//! Render use cases over an in-memory report.

use jsongate_types::ReportEnvelope;

pub fn render_markdown(report: &ReportEnvelope) -> String {
    jsongate_render::render_markdown(report)
}

/// Log lines for every rule result, each terminated by a newline.
pub fn render_text(report: &ReportEnvelope) -> String {
    jsongate_render::render_text(&report.response)
        .into_iter()
        .map(|line| line + "\n")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsongate_types::{
        PolicyResult, Response, ResultCounts, RuleResult, SCHEMA_REPORT_V1, ToolMeta, Verdict,
    };
    use time::OffsetDateTime;

    fn sample_report() -> ReportEnvelope {
        let now = OffsetDateTime::now_utc();
        ReportEnvelope {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "jsongate".to_string(),
                version: "0.1.0".to_string(),
            },
            started_at: now,
            finished_at: now,
            verdict: Verdict::Pass,
            counts: ResultCounts {
                pass: 2,
                fail: 0,
                error: 0,
            },
            response: Response {
                policies: vec![PolicyResult {
                    policy: "authz".to_string(),
                    rules: vec![
                        RuleResult::pass("authz", "delete-checks", "Annie"),
                        RuleResult::pass("authz", "delete-checks", "Bob"),
                    ],
                }],
            },
        }
    }

    #[test]
    fn render_text_has_one_line_per_result() {
        assert_eq!(
            render_text(&sample_report()),
            "pass: authz/delete-checks -> Annie\npass: authz/delete-checks -> Bob\n"
        );
    }

    #[test]
    fn render_markdown_smoke() {
        let markdown = render_markdown(&sample_report());
        assert!(markdown.contains("## Policy `authz`"));
    }
}
