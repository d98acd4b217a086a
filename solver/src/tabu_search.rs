#[cfg(test)]
mod tests;

use std::collections::VecDeque;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use model::base_types::{BlockIdx, MachineIdx, ShiftKey};
use solution::SlotChange;

use crate::result::SolveOutcome;
use crate::setup::{mix_seed, SearchSetup};
use crate::telemetry::Progress;
use crate::{Solution, Solver};

pub const NAME: &str = "tabu";

/// (machine, slot, content): forbids putting `content` back into the slot.
type Attribute = (MachineIdx, ShiftKey, Option<BlockIdx>);

/// The attributes of the last `tenure` moves.
pub struct TabuList {
    tenure: usize,
    moves: VecDeque<Vec<Attribute>>,
}

impl TabuList {
    pub fn new(tenure: usize) -> TabuList {
        TabuList {
            tenure,
            moves: VecDeque::with_capacity(tenure + 1),
        }
    }

    /// A move is tabu if it restores the content of any slot changed by a recent move.
    pub fn is_tabu(&self, changes: &[SlotChange]) -> bool {
        changes.iter().any(|change| {
            let attribute = (change.machine, change.key, change.after);
            self.moves.iter().any(|recent| recent.contains(&attribute))
        })
    }

    pub fn record(&mut self, changes: &[SlotChange]) {
        if self.tenure == 0 {
            return;
        }
        self.moves.push_back(
            changes
                .iter()
                .map(|change| (change.machine, change.key, change.before))
                .collect(),
        );
        while self.moves.len() > self.tenure {
            self.moves.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

struct Candidate {
    operator: &'static str,
    solution: Solution,
    changes: Vec<SlotChange>,
}

/// Tabu search: every iteration samples `tabu_candidates` neighbors (in parallel on the
/// worker pool) and moves to the best one that is not tabu, even if it is worse. A tabu
/// neighbor is admissible if it beats the best solution found so far. After
/// `restart_interval` iterations without a new best the search returns to the best solution.
pub struct TabuSearch {
    setup: Arc<SearchSetup>,
}

impl Solver for TabuSearch {
    fn initialize(setup: Arc<SearchSetup>) -> Self {
        TabuSearch { setup }
    }

    fn solve(&self) -> SolveOutcome {
        let setup = self.setup.as_ref();
        let config = setup.config();
        let max_iterations = config.iterations;
        let samples = config.tabu_candidates.max(1);

        let initial = setup.initial_solution();
        let mut current = initial.clone();
        let mut best = initial.clone();
        let mut tabu_list = TabuList::new(config.tabu_tenure(setup.problem().number_of_machines()));

        let mut recorder = setup.recorder(NAME);
        let mut operator_stats = setup.registry().empty_stats();
        let mut proposals = 0u64;
        let mut accepted = 0u64;
        let mut restarts = 0u64;
        let mut since_best = 0;
        let mut cancelled = false;

        recorder.start(
            config.seed,
            Progress::new(
                0,
                current.total(),
                best.total(),
                None,
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
            let iteration_seed = mix_seed(config.seed, iteration as u64);
            let state = &current;
            let candidates: Vec<Candidate> = setup
                .map_batch(0..samples, |j| {
                    let mut rng = StdRng::seed_from_u64(mix_seed(iteration_seed, j as u64));
                    let (operator, schedule) =
                        setup.propose(state.solution().get_schedule(), &mut rng, 1)?;
                    let changes = state.solution().get_schedule().diff(&schedule);
                    Some(Candidate {
                        operator,
                        solution: setup.evaluate(schedule),
                        changes,
                    })
                })
                .into_iter()
                .flatten()
                .collect();
            iteration += 1;

            proposals += candidates.len() as u64;
            for candidate in candidates.iter() {
                operator_stats
                    .entry(candidate.operator.to_string())
                    .or_default()
                    .proposals += 1;
            }

            // best admissible candidate; ties are resolved by sample order
            let mut chosen: Option<Candidate> = None;
            for candidate in candidates {
                let admissible =
                    candidate.solution > best || !tabu_list.is_tabu(&candidate.changes);
                if admissible
                    && chosen
                        .as_ref()
                        .map_or(true, |c| candidate.solution > c.solution)
                {
                    chosen = Some(candidate);
                }
            }

            if let Some(candidate) = chosen {
                accepted += 1;
                let stats = operator_stats
                    .entry(candidate.operator.to_string())
                    .or_default();
                stats.accepted += 1;
                if candidate.solution > current {
                    stats.improvements += 1;
                }
                tabu_list.record(&candidate.changes);
                current = candidate.solution;
            }

            if current > best {
                best = current.clone();
                since_best = 0;
            } else {
                since_best += 1;
                if config.restart_interval > 0 && since_best >= config.restart_interval {
                    current = best.clone();
                    tabu_list.clear();
                    restarts += 1;
                    since_best = 0;
                }
            }

            recorder.step(
                Progress::new(
                    iteration,
                    current.total(),
                    best.total(),
                    None,
                    proposals,
                    accepted,
                ),
                restarts,
                setup.worker_utilisation(samples),
            );
        }

        if config.verbose {
            println!("\ntabu search: best solution");
            setup
                .objective()
                .print_objective_value_with_comparison(best.objective_value(), initial.objective_value());
        }
        recorder.finish(
            Progress::new(
                iteration,
                current.total(),
                best.total(),
                None,
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
