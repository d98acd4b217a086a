use std::sync::Arc;

use model::OperationalProblem;

use crate::config::{Algorithm, SolverConfig};
use crate::error::SolverError;
use crate::iterated_local_search::IteratedLocalSearch;
use crate::result::SolveResult;
use crate::setup::{RunHooks, SearchSetup};
use crate::simulated_annealing::SimulatedAnnealing;
use crate::tabu_search::TabuSearch;
use crate::Solver;

/// One search run with the configured algorithm. Fails only on invalid configuration.
pub fn solve(
    problem: Arc<OperationalProblem>,
    config: SolverConfig,
    hooks: RunHooks,
) -> Result<SolveResult, SolverError> {
    let setup = Arc::new(SearchSetup::new(problem, config, hooks)?);
    let outcome = match setup.config().algorithm {
        Algorithm::SimulatedAnnealing => SimulatedAnnealing::initialize(setup.clone()).solve(),
        Algorithm::IteratedLocalSearch => IteratedLocalSearch::initialize(setup.clone()).solve(),
        Algorithm::TabuSearch => TabuSearch::initialize(setup.clone()).solve(),
    };
    if setup.config().verbose {
        println!(
            "\n{}: {} iterations, {} proposals, {} accepted, {} restarts",
            outcome.run_id, outcome.iterations, outcome.proposals, outcome.accepted, outcome.restarts
        );
        setup
            .objective()
            .print_objective_value(outcome.best.objective_value());
    }
    Ok(SolveResult::new(outcome, &setup))
}
