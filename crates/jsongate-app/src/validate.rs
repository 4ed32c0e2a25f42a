//! The `validate` use case: load policies without evaluating anything.

use crate::scan::{PolicySource, load_sources};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicySummary {
    pub name: String,
    pub rules: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidateOutput {
    pub policies: Vec<PolicySummary>,
}

pub fn run_validate(sources: &[PolicySource<'_>]) -> anyhow::Result<ValidateOutput> {
    let policies = load_sources(sources)?
        .into_iter()
        .map(|p| PolicySummary {
            rules: p.rules.len(),
            name: p.name,
        })
        .collect();
    Ok(ValidateOutput { policies })
}

pub fn format_validation(output: &ValidateOutput) -> String {
    let mut out = String::new();
    for policy in &output.policies {
        let noun = if policy.rules == 1 { "rule" } else { "rules" };
        out.push_str(&format!("ok: {} ({} {noun})\n", policy.name, policy.rules));
    }
    out.push_str(&format!("{} policies valid\n", output.policies.len()));
    out
}
