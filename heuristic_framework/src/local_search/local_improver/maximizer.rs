use std::sync::Arc;

use objective_framework::{EvaluatedSolution, Objective};
use rayon::iter::{ParallelBridge, ParallelIterator};

use super::LocalImprover;
use crate::local_search::Neighborhood;

/// Evaluates all neighbors in parallel and takes the best one. Among equally good neighbors the
/// one coming first in the neighborhood wins, so the result does not depend on the thread
/// scheduling.
pub struct Maximizer<S> {
    neighborhood: Arc<dyn Neighborhood<S>>,
    objective: Arc<Objective<S>>,
}

impl<S> Maximizer<S> {
    pub fn new(neighborhood: Arc<dyn Neighborhood<S>>, objective: Arc<Objective<S>>) -> Maximizer<S> {
        Maximizer {
            neighborhood,
            objective,
        }
    }
}

impl<S: Send + Sync> LocalImprover<S> for Maximizer<S> {
    fn improve(&self, solution: &EvaluatedSolution<S>) -> Option<EvaluatedSolution<S>> {
        let best_neighbor_opt = self
            .neighborhood
            .neighbors_of(solution.solution())
            .enumerate()
            .par_bridge()
            .map(|(position, neighbor)| (position, self.objective.evaluate(neighbor)))
            .reduce_with(|a, b| {
                if b.1 > a.1 || (b.1 == a.1 && b.0 < a.0) {
                    b
                } else {
                    a
                }
            });
        match best_neighbor_opt {
            Some((_, best_neighbor)) if best_neighbor.objective_value() > solution.objective_value() => {
                Some(best_neighbor)
            }
            _ => None, // no improvement found
        }
    }
}
