#[cfg(test)]
mod tests;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use heuristic_framework::local_search::local_improver::{LocalImprover, Maximizer, TakeFirst};
use heuristic_framework::local_search::{LocalSearchSolver, Neighborhood};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use solution::Schedule;

use crate::config::LocalImproverKind;
use crate::objective::ScheduleWithKpis;
use crate::result::SolveOutcome;
use crate::setup::{mix_seed, SearchSetup};
use crate::telemetry::Progress;
use crate::{Solution, Solver};

pub const NAME: &str = "ils";

/// A fixed number of random operator applications per call. Every call draws from its own
/// stream, derived from the seed of the neighborhood and the number of previous calls.
pub struct SampledNeighborhood {
    setup: Arc<SearchSetup>,
    seed: u64,
    samples: usize,
    calls: AtomicU64,
}

impl SampledNeighborhood {
    pub fn new(setup: Arc<SearchSetup>, seed: u64, samples: usize) -> SampledNeighborhood {
        SampledNeighborhood {
            setup,
            seed,
            samples,
            calls: AtomicU64::new(0),
        }
    }
}

impl Neighborhood<ScheduleWithKpis> for SampledNeighborhood {
    fn neighbors_of<'a>(
        &'a self,
        solution: &'a ScheduleWithKpis,
    ) -> Box<dyn Iterator<Item = ScheduleWithKpis> + Send + 'a> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let mut rng = StdRng::seed_from_u64(mix_seed(self.seed, call));
        let setup = self.setup.as_ref();
        Box::new((0..self.samples).filter_map(move |_| {
            setup
                .propose(solution.get_schedule(), &mut rng, 1)
                .map(|(_, schedule)| ScheduleWithKpis::new(schedule, setup.problem()))
        }))
    }
}

/// `strength` operator applications in a row, each a single change of the evolving schedule.
/// Returns the operators that changed something.
pub(crate) fn perturb(
    setup: &SearchSetup,
    schedule: &Schedule,
    rng: &mut StdRng,
    strength: usize,
) -> (Vec<&'static str>, Schedule) {
    let mut operators = Vec::new();
    let mut perturbed = schedule.clone();
    for _ in 0..strength {
        if let Some((operator, schedule)) = setup.propose(&perturbed, rng, 1) {
            operators.push(operator);
            perturbed = schedule;
        }
    }
    (operators, perturbed)
}

struct Candidate {
    operators: Vec<&'static str>,
    solution: Solution,
}

/// Iterated local search: perturbs the incumbent with `perturbation_strength` operator
/// applications, improves the result by a local search of at most `local_search_steps`
/// steps over a sampled neighborhood and takes it if it beats the incumbent.
///
/// Batching works as in simulated annealing: the candidates of several iterations are built
/// from the same incumbent and committed in order until one is taken.
pub struct IteratedLocalSearch {
    setup: Arc<SearchSetup>,
}

impl IteratedLocalSearch {
    fn candidate(&self, incumbent: &Solution, iteration: usize) -> Option<Candidate> {
        let setup = &self.setup;
        let config = setup.config();
        let strength = config.perturbation_strength();
        let mut rng = setup.iteration_rng(iteration);

        let (operators, perturbed) =
            perturb(setup, incumbent.solution().get_schedule(), &mut rng, strength);
        if operators.is_empty() {
            return None;
        }

        let neighborhood = Arc::new(SampledNeighborhood::new(
            setup.clone(),
            rng.gen::<u64>(),
            config.local_search_samples,
        ));
        let objective = setup.objective();
        let improver: Box<dyn LocalImprover<ScheduleWithKpis>> = match config.local_improver {
            LocalImproverKind::TakeFirst => {
                Box::new(TakeFirst::new(neighborhood.clone(), objective.clone()))
            }
            LocalImproverKind::Best => {
                Box::new(Maximizer::new(neighborhood.clone(), objective.clone()))
            }
        };
        let local_search = LocalSearchSolver::with_local_improver_and_function(
            neighborhood,
            objective,
            Some(improver),
            None,
            Some(config.local_search_steps),
        );
        Some(Candidate {
            operators,
            solution: local_search.improve(setup.evaluate(perturbed)),
        })
    }
}

impl Solver for IteratedLocalSearch {
    fn initialize(setup: Arc<SearchSetup>) -> Self {
        IteratedLocalSearch { setup }
    }

    fn solve(&self) -> SolveOutcome {
        let setup = self.setup.as_ref();
        let config = setup.config();
        let max_iterations = config.iterations;

        let initial = setup.initial_solution();
        let mut incumbent = initial.clone();

        let mut recorder = setup.recorder(NAME);
        let mut operator_stats = setup.registry().empty_stats();
        let mut proposals = 0u64;
        let mut accepted = 0u64;
        let mut cancelled = false;
        let mut rolling = incumbent.total();

        recorder.start(
            config.seed,
            Progress::new(0, rolling, rolling, None, 0, 0),
        );

        let mut iteration = 0;
        while iteration < max_iterations {
            if setup.is_cancelled() {
                cancelled = true;
                break;
            }
            let span = setup.batch_span().min(max_iterations - iteration);
            let state = &incumbent;
            let candidates: Vec<Option<Candidate>> = setup
                .map_batch(iteration..iteration + span, |k| self.candidate(state, k));

            for candidate in candidates {
                iteration += 1;
                let mut taken = false;
                if let Some(candidate) = candidate {
                    proposals += 1;
                    rolling = candidate.solution.total();
                    let improved = candidate.solution > incumbent;
                    for operator in candidate.operators.iter() {
                        let stats = operator_stats.entry(operator.to_string()).or_default();
                        stats.proposals += 1;
                        if improved {
                            stats.accepted += 1;
                            stats.improvements += 1;
                        }
                    }
                    if improved {
                        accepted += 1;
                        incumbent = candidate.solution;
                        taken = true;
                    }
                }

                recorder.step(
                    Progress::new(
                        iteration,
                        rolling,
                        incumbent.total(),
                        None,
                        proposals,
                        accepted,
                    ),
                    0,
                    setup.worker_utilisation(span),
                );

                if taken {
                    break;
                }
            }
        }

        if config.verbose {
            println!("\niterated local search: best solution");
            setup
                .objective()
                .print_objective_value_with_comparison(incumbent.objective_value(), initial.objective_value());
        }
        recorder.finish(
            Progress::new(
                iteration,
                rolling,
                incumbent.total(),
                None,
                proposals,
                accepted,
            ),
            0,
        );

        SolveOutcome {
            best: incumbent,
            solver: NAME,
            run_id: recorder.run_id().to_string(),
            iterations: iteration,
            proposals,
            accepted,
            restarts: 0,
            operator_stats,
            cancelled,
        }
    }
}
