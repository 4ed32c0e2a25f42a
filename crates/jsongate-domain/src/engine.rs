use crate::context::EvalContext;
use crate::model::{Request, Rule};
use crate::options::EngineOptions;
use crate::rule::evaluate_rule;
use jsongate_types::{PolicyResult, Response, RuleResult};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build evaluation worker pool with {threads} threads")]
    WorkerPool {
        threads: usize,
        #[source]
        source: ThreadPoolBuildError,
    },
}

/// Evaluates requests against their policies.
///
/// Every (policy, rule) pair is an independent unit of work. Units run on a bounded rayon
/// pool and write into slots allocated up front, so the response order never depends on
/// completion order.
pub struct Engine {
    options: EngineOptions,
    pool: Option<ThreadPool>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Result<Self, EngineError> {
        let pool = match options.max_parallelism {
            0 | 1 => None,
            threads => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("jsongate-eval-{i}"))
                    .build()
                    .map_err(|source| EngineError::WorkerPool { threads, source })?,
            ),
        };
        Ok(Self { options, pool })
    }

    /// Evaluate every rule of every policy in `request`.
    ///
    /// Always returns a complete response: one `PolicyResult` per policy in request order,
    /// rule results in declaration order, then identifier order. Rule failures, including
    /// cancellation, are recorded on their own results.
    pub fn run(&self, ctx: &EvalContext, request: &Request) -> Response {
        let units: Vec<Unit<'_>> = request
            .policies
            .iter()
            .enumerate()
            .flat_map(|(policy_index, policy)| {
                policy.rules.iter().map(move |rule| Unit {
                    policy_index,
                    policy: policy.name.as_str(),
                    rule,
                })
            })
            .collect();

        debug!(
            policies = request.policies.len(),
            rules = units.len(),
            max_parallelism = self.options.max_parallelism,
            "evaluating request"
        );

        let options = &self.options;
        let resource = &request.resource;
        let mut slots: Vec<Vec<RuleResult>> = vec![Vec::new(); units.len()];
        let evaluate = |slot: &mut Vec<RuleResult>, unit: &Unit<'_>| {
            *slot = evaluate_rule(unit.policy, unit.rule, resource, options, ctx);
        };

        match (&self.pool, self.options.max_parallelism) {
            (_, 1) => slots
                .iter_mut()
                .zip(&units)
                .for_each(|(slot, unit)| evaluate(slot, unit)),
            (Some(pool), _) => pool.install(|| {
                slots
                    .par_iter_mut()
                    .zip(units.par_iter())
                    .for_each(|(slot, unit)| evaluate(slot, unit))
            }),
            (None, _) => slots
                .par_iter_mut()
                .zip(units.par_iter())
                .for_each(|(slot, unit)| evaluate(slot, unit)),
        }

        let mut policies: Vec<PolicyResult> = request
            .policies
            .iter()
            .map(|p| PolicyResult {
                policy: p.name.clone(),
                rules: Vec::new(),
            })
            .collect();

        for (unit, results) in units.iter().zip(slots) {
            for result in &results {
                if let Some(err) = result.error() {
                    warn!(
                        policy = %result.policy,
                        rule = %result.rule,
                        identifier = %result.identifier,
                        code = err.code(),
                        "rule evaluation failed: {err}"
                    );
                }
            }
            policies[unit.policy_index].rules.extend(results);
        }

        Response { policies }
    }
}

struct Unit<'a> {
    policy_index: usize,
    policy: &'a str,
    rule: &'a Rule,
}
