
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::sync_channel;
use std::sync::Arc;

use serde::Serialize;

use model::OperationalProblem;

use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::result::SolveResult;
use crate::run;
use crate::setup::RunHooks;

/// One (seed, preset) search of a multi-start run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub index: usize,
    pub seed: u64,
    pub preset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummary {
    pub index: usize,
    pub seed: u64,
    pub preset: Option<String>,
    pub objective: Option<f64>,
    pub run_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MultiStartResult {
    pub best: SolveResult,
    pub attempts: Vec<AttemptSummary>,
}

/// Runs independent attempts on a bounded worker pool. The attempts share only the problem;
/// results come back over a channel and are ordered by attempt index before the best is
/// picked, so the outcome does not depend on the scheduling of the workers.
pub struct MultiStart {
    problem: Arc<OperationalProblem>,
    config: SolverConfig,
    hooks: RunHooks,
}

impl MultiStart {
    pub fn new(
        problem: Arc<OperationalProblem>,
        config: SolverConfig,
        hooks: RunHooks,
    ) -> Result<MultiStart, SolverError> {
        config.validate()?;
        Ok(MultiStart {
            problem,
            config,
            hooks,
        })
    }

    /// Seeds `seed + i`; presets cycle through `multiStart.presets` (the configured preset if
    /// that list is empty).
    pub fn plan(&self) -> Vec<Attempt> {
        let multi_start = &self.config.multi_start;
        (0..multi_start.runs.max(1))
            .map(|index| Attempt {
                index,
                seed: self.config.seed.wrapping_add(index as u64),
                preset: if multi_start.presets.is_empty() {
                    self.config.preset.clone()
                } else {
                    Some(multi_start.presets[index % multi_start.presets.len()].clone())
                },
            })
            .collect()
    }

    pub fn run(&self) -> Result<MultiStartResult, SolverError> {
        self.run_with(|attempt| self.run_attempt(attempt))
    }

    /// Runs every planned attempt through `runner`. A panicking attempt is reported as failed;
    /// the other attempts are not affected.
    fn run_with<F>(&self, runner: F) -> Result<MultiStartResult, SolverError>
    where
        F: Fn(&Attempt) -> Result<SolveResult, SolverError> + Sync,
    {
        let attempts = self.plan();
        let workers = self
            .config
            .multi_start
            .max_workers
            .unwrap_or(attempts.len())
            .clamp(1, attempts.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|err| SolverError::InvalidConfig(err.to_string()))?;

        if self.config.verbose {
            println!(
                "\n********** MULTI-START: {} attempts on {} workers **********",
                attempts.len(),
                workers
            );
        }

        let (sender, receiver) = sync_channel(attempts.len());
        pool.scope(|scope| {
            for attempt in attempts.iter() {
                let sender = sender.clone();
                let runner = &runner;
                scope.spawn(move |_| {
                    let result = isolated(|| runner(attempt));
                    // capacity equals the number of attempts, so this never blocks
                    let _ = sender.send((attempt.index, result));
                });
            }
        });
        drop(sender);

        let mut results: Vec<(usize, Result<SolveResult, SolverError>)> =
            receiver.into_iter().collect();
        results.sort_by_key(|(index, _)| *index);

        collect_results(
            attempts
                .into_iter()
                .zip(results.into_iter().map(|(_, result)| result))
                .collect(),
        )
    }

    fn run_attempt(&self, attempt: &Attempt) -> Result<SolveResult, SolverError> {
        let config = self
            .config
            .for_attempt(attempt.seed, attempt.preset.clone());
        run::solve(self.problem.clone(), config, self.hooks.clone())
    }
}

/// Turns a panic of the attempt into [`SolverError::AttemptPanicked`].
pub(crate) fn isolated<F>(attempt: F) -> Result<SolveResult, SolverError>
where
    F: FnOnce() -> Result<SolveResult, SolverError>,
{
    panic::catch_unwind(AssertUnwindSafe(attempt)).unwrap_or_else(|payload| {
        Err(SolverError::AttemptPanicked(panic_message(payload.as_ref())))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown cause")
    }
}

/// Picks the result with the highest objective (ties: lowest attempt index). Fails only if
/// every attempt failed.
pub(crate) fn collect_results(
    results: Vec<(Attempt, Result<SolveResult, SolverError>)>,
) -> Result<MultiStartResult, SolverError> {
    let mut summaries = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    let mut best: Option<SolveResult> = None;

    for (attempt, result) in results {
        match result {
            Ok(solve_result) => {
                summaries.push(AttemptSummary {
                    index: attempt.index,
                    seed: attempt.seed,
                    preset: attempt.preset,
                    objective: Some(solve_result.objective),
                    run_id: Some(solve_result.meta.telemetry_run_id.clone()),
                    error: None,
                });
                if best
                    .as_ref()
                    .map_or(true, |b| solve_result.objective > b.objective)
                {
                    best = Some(solve_result);
                }
            }
            Err(err) => {
                errors.push(format!("attempt {} (seed {}): {}", attempt.index, attempt.seed, err));
                summaries.push(AttemptSummary {
                    index: attempt.index,
                    seed: attempt.seed,
                    preset: attempt.preset,
                    objective: None,
                    run_id: None,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    match best {
        Some(best) => Ok(MultiStartResult {
            best,
            attempts: summaries,
        }),
        None => Err(SolverError::AllRunsFailed(errors.join("; "))),
    }
}
