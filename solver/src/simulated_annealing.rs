#[cfg(test)]
mod tests;

use std::sync::Arc;

use rand::Rng;

use crate::result::SolveOutcome;
use crate::setup::SearchSetup;
use crate::telemetry::Progress;
use crate::{Solution, Solver};

pub const NAME: &str = "sa";

const COOLING_RATE: f64 = 0.995;

/// T0 = max(1, |best| / 10)
pub fn initial_temperature(objective: f64) -> f64 {
    (objective.abs() / 10.0).max(1.0)
}

pub fn temperature(initial_temperature: f64, iteration: usize) -> f64 {
    initial_temperature * COOLING_RATE.powf(iteration as f64)
}

/// Metropolis criterion on a maximization objective.
pub fn accepts(delta: f64, temperature: f64, draw: f64) -> bool {
    delta >= 0.0 || (temperature > 0.0 && draw < (delta / temperature).exp())
}

struct Candidate {
    operator: &'static str,
    solution: Solution,
    draw: f64,
}

/// Simulated annealing with geometric cooling and restarts to the start solution when no
/// candidate was accepted for `restart_interval` iterations.
///
/// With a batch size k > 1 the candidates of the next k iterations are built in parallel
/// from the current solution. They are committed in iteration order; the first accepted one
/// (or a restart) invalidates the rest of the batch. Every iteration draws from its own
/// random stream, so the trajectory does not depend on the batch size.
pub struct SimulatedAnnealing {
    setup: Arc<SearchSetup>,
}

impl Solver for SimulatedAnnealing {
    fn initialize(setup: Arc<SearchSetup>) -> Self {
        SimulatedAnnealing { setup }
    }

    fn solve(&self) -> SolveOutcome {
        let setup = self.setup.as_ref();
        let config = setup.config();
        let max_iterations = config.iterations;

        let initial = setup.initial_solution();
        let start_temperature = initial_temperature(initial.total());
        let mut current = initial.clone();
        let mut best = initial.clone();

        let mut recorder = setup.recorder(NAME);
        let mut operator_stats = setup.registry().empty_stats();
        let mut proposals = 0u64;
        let mut accepted = 0u64;
        let mut restarts = 0u64;
        let mut since_acceptance = 0;
        let mut cancelled = false;

        recorder.start(
            config.seed,
            Progress::new(
                0,
                current.total(),
                best.total(),
                Some(start_temperature),
                0,
                0,
            ),
        );

        let mut iteration = 0;
        while iteration < max_iterations {
            if setup.is_cancelled() {
                cancelled = true;
                break;
            }
            let span = setup.batch_span().min(max_iterations - iteration);
            let state = &current;
            let candidates: Vec<Option<Candidate>> =
                setup.map_batch(iteration..iteration + span, |k| {
                    let mut rng = setup.iteration_rng(k);
                    let (operator, schedule) =
                        setup.propose(state.solution().get_schedule(), &mut rng, 1)?;
                    let draw = rng.gen::<f64>();
                    Some(Candidate {
                        operator,
                        solution: setup.evaluate(schedule),
                        draw,
                    })
                });

            for candidate in candidates {
                let current_temperature = temperature(start_temperature, iteration);
                iteration += 1;

                let mut changed = false;
                if let Some(candidate) = candidate {
                    proposals += 1;
                    let stats = operator_stats
                        .entry(candidate.operator.to_string())
                        .or_default();
                    stats.proposals += 1;
                    let delta = candidate.solution.delta(&current);
                    if accepts(delta, current_temperature, candidate.draw) {
                        accepted += 1;
                        stats.accepted += 1;
                        if delta > 0.0 {
                            stats.improvements += 1;
                        }
                        current = candidate.solution;
                        if current > best {
                            best = current.clone();
                        }
                        changed = true;
                        since_acceptance = 0;
                    }
                }
                if !changed {
                    since_acceptance += 1;
                    if config.restart_interval > 0 && since_acceptance >= config.restart_interval
                    {
                        current = initial.clone();
                        restarts += 1;
                        since_acceptance = 0;
                        changed = true;
                    }
                }

                recorder.step(
                    Progress::new(
                        iteration,
                        current.total(),
                        best.total(),
                        Some(current_temperature),
                        proposals,
                        accepted,
                    ),
                    restarts,
                    setup.worker_utilisation(span),
                );

                if changed {
                    break;
                }
            }
        }

        if config.verbose {
            println!("\nsimulated annealing: best solution");
            setup
                .objective()
                .print_objective_value_with_comparison(best.objective_value(), initial.objective_value());
        }
        recorder.finish(
            Progress::new(
                iteration,
                current.total(),
                best.total(),
                Some(temperature(start_temperature, iteration)),
                proposals,
                accepted,
            ),
            restarts,
        );

        SolveOutcome {
            best,
            solver: NAME,
            run_id: recorder.run_id().to_string(),
            iterations: iteration,
            proposals,
            accepted,
            restarts,
            operator_stats,
            cancelled,
        }
    }
}
