use rand::Rng;
use solution::Schedule;

use super::{Operator, OperatorContext};

/// Removes relocations: picks a slot where a machine changes block and lets it stay on the
/// previous block instead. Repeated `strength` times on the evolving schedule.
pub struct MobilisationShake;

impl Operator for MobilisationShake {
    fn name(&self) -> &'static str {
        "mobilisation_shake"
    }

    fn default_weight(&self) -> f64 {
        0.0
    }

    fn apply(&self, context: &mut OperatorContext) -> Option<Schedule> {
        let problem = context.problem;
        let mut schedule = context.schedule.clone();
        for _ in 0..context.strength.max(1) {
            let machine = match context.random_machine() {
                Some(machine) => machine,
                None => break,
            };
            let mut transitions = Vec::new();
            let mut previous = None;
            for (key, block) in schedule.occupied_slots(machine) {
                if let Some(from) = previous {
                    if from != block
                        && !context.is_locked(machine, key)
                        && problem.can_work(machine, from, key)
                    {
                        transitions.push((key, from));
                    }
                }
                previous = Some(block);
            }
            if transitions.is_empty() {
                continue;
            }
            let (key, stay) = transitions[context.rng.gen_range(0..transitions.len())];
            schedule.set(machine, key, Some(stay));
        }
        context.finish(schedule)
    }
}
