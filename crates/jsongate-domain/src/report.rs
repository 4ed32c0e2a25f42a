use crate::options::FailOn;
use jsongate_types::{Outcome, ResultCounts, Response, Verdict};

/// Counts and verdict for one response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub verdict: Verdict,
    pub counts: ResultCounts,
}

impl Summary {
    pub fn of(response: &Response) -> Self {
        let counts = count_results(response);
        Self {
            verdict: compute_verdict(&counts),
            counts,
        }
    }

    /// Whether this summary should fail the caller under `fail_on`.
    pub fn is_failing(&self, fail_on: FailOn) -> bool {
        verdict_fails(self.verdict, fail_on)
    }
}

/// `Error` always fails; `Fail` fails unless only errors are fatal.
pub fn verdict_fails(verdict: Verdict, fail_on: FailOn) -> bool {
    match (verdict, fail_on) {
        (Verdict::Pass, _) => false,
        (Verdict::Error, _) => true,
        (Verdict::Fail, FailOn::Fail) => true,
        (Verdict::Fail, FailOn::Error) => false,
    }
}

pub fn count_results(response: &Response) -> ResultCounts {
    let mut counts = ResultCounts::default();
    for result in response.rule_results() {
        match result.outcome() {
            Outcome::Pass => counts.pass += 1,
            Outcome::Fail => counts.fail += 1,
            Outcome::Error => counts.error += 1,
        }
    }
    counts
}

pub fn compute_verdict(counts: &ResultCounts) -> Verdict {
    if counts.error > 0 {
        Verdict::Error
    } else if counts.fail > 0 {
        Verdict::Fail
    } else {
        Verdict::Pass
    }
}
