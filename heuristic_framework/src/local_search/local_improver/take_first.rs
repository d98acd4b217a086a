use std::sync::Arc;

use objective_framework::{EvaluatedSolution, Objective};

use super::LocalImprover;
use crate::local_search::Neighborhood;

/// Evaluates the neighbors one after another and takes the first improving one.
pub struct TakeFirst<S> {
    neighborhood: Arc<dyn Neighborhood<S>>,
    objective: Arc<Objective<S>>,
}

impl<S> TakeFirst<S> {
    pub fn new(neighborhood: Arc<dyn Neighborhood<S>>, objective: Arc<Objective<S>>) -> TakeFirst<S> {
        TakeFirst {
            neighborhood,
            objective,
        }
    }
}

impl<S: Send + Sync> LocalImprover<S> for TakeFirst<S> {
    fn improve(&self, solution: &EvaluatedSolution<S>) -> Option<EvaluatedSolution<S>> {
        self.neighborhood
            .neighbors_of(solution.solution())
            .map(|neighbor| self.objective.evaluate(neighbor))
            .find(|neighbor| neighbor.objective_value() > solution.objective_value())
    }
}
