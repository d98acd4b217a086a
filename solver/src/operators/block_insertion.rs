use rand::Rng;
use solution::Schedule;

use super::{Operator, OperatorContext, ATTEMPTS};

/// Puts a machine on a (different) block it can work on in a random shift. Blocks close to the
/// machine's previous block are preferred, with weight `1 / (1 + distance in km)`.
pub struct BlockInsertion;

impl Operator for BlockInsertion {
    fn name(&self) -> &'static str {
        "block_insertion"
    }

    fn default_weight(&self) -> f64 {
        0.0
    }

    fn apply(&self, context: &mut OperatorContext) -> Option<Schedule> {
        let problem = context.problem;
        for _ in 0..ATTEMPTS {
            let machine = context.random_machine()?;
            let key = context.random_key()?;
            if context.is_locked(machine, key) || !problem.is_available(machine, key) {
                continue;
            }
            let current = context.schedule.assignment(machine, key);
            let previous = context.schedule.previous_block(machine, key);
            let candidates: Vec<_> = problem
                .blocks()
                .filter(|&b| Some(b) != current && problem.can_work(machine, b, key))
                .map(|b| {
                    let weight = match previous {
                        Some(p) => 1.0 / (1.0 + problem.distance(p, b) / 1000.0),
                        None => 1.0,
                    };
                    (b, weight)
                })
                .collect();
            if candidates.is_empty() {
                continue;
            }
            let total: f64 = candidates.iter().map(|(_, w)| w).sum();
            let mut pick = context.rng.gen::<f64>() * total;
            let mut chosen = candidates[candidates.len() - 1].0;
            for &(block, weight) in candidates.iter() {
                if pick < weight {
                    chosen = block;
                    break;
                }
                pick -= weight;
            }
            return context.finish(context.schedule.with_assignment(machine, key, Some(chosen)));
        }
        None
    }
}
