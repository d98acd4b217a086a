pub mod local_improver;

use std::sync::Arc;

use crate::Solver;
use local_improver::{LocalImprover, TakeFirst};
use objective_framework::EvaluatedSolution;
use objective_framework::Objective;

/// Defines the neighbors of a solution. The iterator may be lazy and may be consumed only
/// partially (e.g. by [`TakeFirst`]).
pub trait Neighborhood<S>: Send + Sync {
    fn neighbors_of<'a>(&'a self, solution: &'a S) -> Box<dyn Iterator<Item = S> + Send + 'a>;
}

/// Called after every improving step with the step number, the new solution and the previous
/// one.
pub type FunctionBetweenSteps<S> =
    Box<dyn Fn(usize, &EvaluatedSolution<S>, &EvaluatedSolution<S>) + Send + Sync>;

/// Repeats the local improver until no improvement is found or `max_steps` improving steps
/// were made.
pub struct LocalSearchSolver<S> {
    objective: Arc<Objective<S>>,
    local_improver: Box<dyn LocalImprover<S>>,
    function_between_steps: FunctionBetweenSteps<S>,
    max_steps: Option<usize>,
}

impl<S: Send + Sync + 'static> LocalSearchSolver<S> {
    /// Local search with the [`TakeFirst`] improver, no step limit and no output.
    pub fn initialize(
        neighborhood: Arc<dyn Neighborhood<S>>,
        objective: Arc<Objective<S>>,
    ) -> LocalSearchSolver<S> {
        LocalSearchSolver::with_local_improver_and_function(
            neighborhood,
            objective,
            None,
            None,
            None,
        )
    }

    pub fn with_local_improver_and_function(
        neighborhood: Arc<dyn Neighborhood<S>>,
        objective: Arc<Objective<S>>,
        local_improver: Option<Box<dyn LocalImprover<S>>>,
        function_between_steps: Option<FunctionBetweenSteps<S>>,
        max_steps: Option<usize>,
    ) -> LocalSearchSolver<S> {
        let local_improver = local_improver
            .unwrap_or_else(|| Box::new(TakeFirst::new(neighborhood, objective.clone())));
        let function_between_steps = function_between_steps.unwrap_or_else(|| {
            Box::new(|_: usize, _: &EvaluatedSolution<S>, _: &EvaluatedSolution<S>| {})
        });
        LocalSearchSolver {
            objective,
            local_improver,
            function_between_steps,
            max_steps,
        }
    }
}

impl<S> LocalSearchSolver<S> {
    /// Runs the local search from an already evaluated solution.
    pub fn improve(&self, start_solution: EvaluatedSolution<S>) -> EvaluatedSolution<S> {
        let mut current = start_solution;
        let mut step = 0;
        while self.max_steps.map_or(true, |max| step < max) {
            match self.local_improver.improve(&current) {
                Some(new_solution) => {
                    step += 1;
                    (self.function_between_steps)(step, &new_solution, &current);
                    current = new_solution;
                }
                None => break,
            }
        }
        current
    }
}

impl<S> Solver<S> for LocalSearchSolver<S> {
    fn solve(&self, initial_solution: S) -> EvaluatedSolution<S> {
        self.improve(self.objective.evaluate(initial_solution))
    }
}
