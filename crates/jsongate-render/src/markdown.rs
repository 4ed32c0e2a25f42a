use crate::text::result_details;
use jsongate_types::{ReportEnvelope, Verdict};

pub fn render_markdown(report: &ReportEnvelope) -> String {
    let mut out = String::new();

    out.push_str("# jsongate report\n\n");
    let verdict = match report.verdict {
        Verdict::Pass => "PASS",
        Verdict::Fail => "FAIL",
        Verdict::Error => "ERROR",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Results: {} pass / {} fail / {} error\n\n",
        verdict, report.counts.pass, report.counts.fail, report.counts.error
    ));

    if report.response.policies.is_empty() {
        out.push_str("No policies evaluated.\n");
        return out;
    }

    for policy in &report.response.policies {
        out.push_str(&format!("## Policy `{}`\n\n", escape_cell(&policy.policy)));
        if policy.rules.is_empty() {
            out.push_str("No rules applied.\n\n");
            continue;
        }
        out.push_str("| Rule | Identifier | Outcome | Details |\n");
        out.push_str("|---|---|---|---|\n");
        for result in &policy.rules {
            out.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                escape_cell(&result.rule),
                identifier_cell(&result.identifier),
                result.outcome().as_str().to_uppercase(),
                escape_cell(&result_details(result).unwrap_or_default()),
            ));
        }
        out.push('\n');
    }

    out
}

fn identifier_cell(identifier: &str) -> String {
    if identifier.is_empty() {
        "-".to_string()
    } else {
        format!("`{}`", escape_cell(identifier))
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
