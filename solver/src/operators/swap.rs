use solution::Schedule;

use super::{Operator, OperatorContext, ATTEMPTS};

/// Exchanges the assignments of two distinct machines on one random shift.
pub struct Swap;

impl Operator for Swap {
    fn name(&self) -> &'static str {
        "swap"
    }

    fn default_weight(&self) -> f64 {
        1.0
    }

    fn apply(&self, context: &mut OperatorContext) -> Option<Schedule> {
        for _ in 0..ATTEMPTS {
            let key = context.random_key()?;
            let (first, second) = context.random_machine_pair()?;
            if context.is_locked(first, key) || context.is_locked(second, key) {
                continue;
            }
            let first_block = context.schedule.assignment(first, key);
            let second_block = context.schedule.assignment(second, key);
            if first_block == second_block {
                continue;
            }
            let mut schedule = context.schedule.clone();
            schedule.set(first, key, second_block);
            schedule.set(second, key, first_block);
            return context.finish(schedule);
        }
        None
    }
}
