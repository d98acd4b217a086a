use rand::Rng;
use solution::Schedule;

use super::{Operator, OperatorContext, ATTEMPTS};

/// Relocates one assignment of a machine to another shift of the same machine; the source slot
/// is cleared.
pub struct MoveAssignment;

impl Operator for MoveAssignment {
    fn name(&self) -> &'static str {
        "move"
    }

    fn default_weight(&self) -> f64 {
        1.0
    }

    fn apply(&self, context: &mut OperatorContext) -> Option<Schedule> {
        for _ in 0..ATTEMPTS {
            let machine = context.random_machine()?;
            let movable: Vec<_> = context
                .schedule
                .occupied_slots(machine)
                .filter(|(key, _)| !context.is_locked(machine, *key))
                .collect();
            if movable.is_empty() {
                continue;
            }
            let (source, block) = movable[context.rng.gen_range(0..movable.len())];
            let target = context.random_key()?;
            if target == source
                || context.is_locked(machine, target)
                || !context.problem.is_available(machine, target)
                || context.schedule.assignment(machine, target) == Some(block)
            {
                continue;
            }
            let mut schedule = context.schedule.clone();
            schedule.set(machine, target, Some(block));
            schedule.set(machine, source, None);
            return context.finish(schedule);
        }
        None
    }
}
