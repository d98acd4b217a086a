#[cfg(test)]
mod tests;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use model::OperationalProblem;
use solution::Schedule;

use crate::locks::LockedAssignments;
use crate::planning_state::PlanningState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairMode {
    /// every slot is re-evaluated; empty available slots are filled.
    Full,
    /// only dirty slots and slots that became infeasible are re-evaluated.
    Limited,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepairStats {
    pub calls: u64,
    pub slots_visited: u64,
    pub slots_processed: u64,
    pub machines_touched: u64,
}

#[derive(Default)]
struct RepairCounters {
    calls: AtomicU64,
    slots_visited: AtomicU64,
    slots_processed: AtomicU64,
    machines_touched: AtomicU64,
}

/// Restores feasibility after a modification by replaying the schedule chronologically: an
/// assignment that cannot produce anything (calendar, window, role, prerequisites, exhausted
/// work, full landing) is replaced by the best feasible block or cleared. Locked slots are
/// kept as they are.
///
/// The engine is shared by the workers of a run; its statistics accumulate over all calls.
pub struct RepairEngine {
    problem: Arc<OperationalProblem>,
    locks: Arc<LockedAssignments>,
    counters: RepairCounters,
}

impl RepairEngine {
    pub fn new(problem: Arc<OperationalProblem>, locks: Arc<LockedAssignments>) -> RepairEngine {
        RepairEngine {
            problem,
            locks,
            counters: RepairCounters::default(),
        }
    }

    pub fn full(&self, schedule: Schedule) -> (Schedule, RepairStats) {
        self.repair(schedule, RepairMode::Full)
    }

    pub fn limited(&self, schedule: Schedule) -> (Schedule, RepairStats) {
        self.repair(schedule, RepairMode::Limited)
    }

    /// Returns the repaired schedule (without dirty slots) and the statistics of this call.
    pub fn repair(&self, schedule: Schedule, mode: RepairMode) -> (Schedule, RepairStats) {
        let problem = self.problem.as_ref();
        let mut state = PlanningState::new(problem, &self.locks);
        let mut repaired = schedule.clone();
        let mut touched = BTreeSet::new();
        let mut stats = RepairStats {
            calls: 1,
            ..RepairStats::default()
        };

        for &key in problem.shift_keys() {
            for machine in problem.machines() {
                stats.slots_visited += 1;
                let current = schedule.assignment(machine, key);

                if let Some(locked) = self.locks.block(machine, key) {
                    state.commit(machine, key, locked);
                    continue;
                }

                let feasible =
                    current.map_or(false, |block| state.is_feasible(machine, key, block));
                let process = match mode {
                    RepairMode::Full => true,
                    RepairMode::Limited => {
                        schedule.is_dirty(machine, key) || (current.is_some() && !feasible)
                    }
                };

                let decision = if !process {
                    current
                } else {
                    stats.slots_processed += 1;
                    match current {
                        Some(block) if feasible => Some(block),
                        Some(_) => state.best_candidate(machine, key),
                        None if mode == RepairMode::Full => state.best_candidate(machine, key),
                        None => None,
                    }
                };

                if decision != current {
                    repaired.set(machine, key, decision);
                    touched.insert(machine);
                }
                if let Some(block) = decision {
                    state.commit(machine, key, block);
                }
            }
        }
        state.finalize();
        repaired.clear_dirty();
        stats.machines_touched = touched.len() as u64;

        self.counters.calls.fetch_add(1, Ordering::Relaxed);
        self.counters
            .slots_visited
            .fetch_add(stats.slots_visited, Ordering::Relaxed);
        self.counters
            .slots_processed
            .fetch_add(stats.slots_processed, Ordering::Relaxed);
        self.counters
            .machines_touched
            .fetch_add(stats.machines_touched, Ordering::Relaxed);
        (repaired, stats)
    }

    /// Statistics accumulated over all calls so far.
    pub fn stats(&self) -> RepairStats {
        RepairStats {
            calls: self.counters.calls.load(Ordering::Relaxed),
            slots_visited: self.counters.slots_visited.load(Ordering::Relaxed),
            slots_processed: self.counters.slots_processed.load(Ordering::Relaxed),
            machines_touched: self.counters.machines_touched.load(Ordering::Relaxed),
        }
    }
}
