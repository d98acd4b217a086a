mod maximizer;
mod take_first;

pub use maximizer::Maximizer;
pub use take_first::TakeFirst;

use objective_framework::EvaluatedSolution;

/// One step of a local search: returns a strictly better neighbor or `None` if the solution is
/// a local optimum (with respect to the neighbors that were looked at).
pub trait LocalImprover<S>: Send + Sync {
    fn improve(&self, solution: &EvaluatedSolution<S>) -> Option<EvaluatedSolution<S>>;
}
