
use std::sync::Arc;

use model::OperationalProblem;
use solution::Schedule;

use crate::locks::LockedAssignments;
use crate::planning_state::PlanningState;

/// Builds a start schedule slot by slot in (day, shift, machine) order: every available
/// machine gets the feasible block with the highest production rate. Locked slots are taken
/// as they are.
pub struct Greedy {
    problem: Arc<OperationalProblem>,
    locks: Arc<LockedAssignments>,
}

impl Greedy {
    pub fn new(problem: Arc<OperationalProblem>, locks: Arc<LockedAssignments>) -> Greedy {
        Greedy { problem, locks }
    }

    pub fn construct(&self) -> Schedule {
        let mut schedule = Schedule::empty();
        let mut state = PlanningState::new(&self.problem, &self.locks);

        for &key in self.problem.shift_keys() {
            for machine in self.problem.machines() {
                let block = match self.locks.block(machine, key) {
                    Some(locked) => Some(locked),
                    None if self.problem.is_available(machine, key) => {
                        state.best_candidate(machine, key)
                    }
                    None => None,
                };
                if let Some(block) = block {
                    schedule.set(machine, key, Some(block));
                    state.commit(machine, key, block);
                }
            }
        }
        state.finalize();
        schedule.clear_dirty();
        schedule
    }
}
