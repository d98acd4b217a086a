use solution::Schedule;

use super::{Operator, OperatorContext, ATTEMPTS};

/// Exchanges assignments between two machines on two (possibly different) shifts.
pub struct CrossExchange;

impl Operator for CrossExchange {
    fn name(&self) -> &'static str {
        "cross_exchange"
    }

    fn default_weight(&self) -> f64 {
        0.0
    }

    fn apply(&self, context: &mut OperatorContext) -> Option<Schedule> {
        for _ in 0..ATTEMPTS {
            let (first, second) = context.random_machine_pair()?;
            let first_key = context.random_key()?;
            let second_key = context.random_key()?;
            if context.is_locked(first, first_key) || context.is_locked(second, second_key) {
                continue;
            }
            let first_block = context.schedule.assignment(first, first_key);
            let second_block = context.schedule.assignment(second, second_key);
            if first_block == second_block
                || !context.problem.is_available(first, first_key)
                || !context.problem.is_available(second, second_key)
            {
                continue;
            }
            let mut schedule = context.schedule.clone();
            schedule.set(first, first_key, second_block);
            schedule.set(second, second_key, first_block);
            return context.finish(schedule);
        }
        None
    }
}
