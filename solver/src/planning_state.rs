use std::collections::{BTreeSet, HashMap};

use model::base_types::{BlockIdx, Day, LandingIdx, MachineIdx, ShiftKey, WORK_EPSILON};
use model::OperationalProblem;
use solution::{SequencingOutcome, SequencingTracker};

use crate::locks::LockedAssignments;

/// Bookkeeping while a schedule is built slot by slot in (day, shift, machine)
/// order: the sequencing state and the machines present at each landing per day.
///
/// Locked slots hold their landing place for the whole day, so earlier unlocked slots cannot
/// push a later locked one over the landing capacity.
pub(crate) struct PlanningState<'a> {
    problem: &'a OperationalProblem,
    tracker: SequencingTracker<'a>,
    landing_usage: HashMap<(Day, LandingIdx), BTreeSet<MachineIdx>>,
}

impl<'a> PlanningState<'a> {
    pub(crate) fn new(
        problem: &'a OperationalProblem,
        locks: &LockedAssignments,
    ) -> PlanningState<'a> {
        let mut landing_usage: HashMap<(Day, LandingIdx), BTreeSet<MachineIdx>> = HashMap::new();
        for (machine, key, block) in locks.iter() {
            if problem.is_available(machine, key) && problem.block_active(block, key.day) {
                landing_usage
                    .entry((key.day, problem.landing_of(block)))
                    .or_default()
                    .insert(machine);
            }
        }
        PlanningState {
            problem,
            tracker: SequencingTracker::new(problem),
            landing_usage,
        }
    }

    fn landing_has_room(&self, machine: MachineIdx, day: Day, landing: LandingIdx) -> bool {
        match self.landing_usage.get(&(day, landing)) {
            None => self.problem.landing_capacity(landing) > 0,
            Some(machines) => {
                machines.contains(&machine)
                    || (machines.len() as u32) < self.problem.landing_capacity(landing)
            }
        }
    }

    /// The machine can work on the block in this slot and would produce something.
    pub(crate) fn is_feasible(&self, machine: MachineIdx, key: ShiftKey, block: BlockIdx) -> bool {
        if !self.problem.can_work(machine, block, key)
            || !self.landing_has_room(machine, key.day, self.problem.landing_of(block))
        {
            return false;
        }
        match self.tracker.check(key.day, machine, block) {
            Ok(role) => self.tracker.producible(block, role) > WORK_EPSILON,
            Err(_) => false,
        }
    }

    /// The feasible block with the highest rate for the machine (ties: lowest block index).
    pub(crate) fn best_candidate(&self, machine: MachineIdx, key: ShiftKey) -> Option<BlockIdx> {
        let mut best: Option<(BlockIdx, f64)> = None;
        for block in self.problem.blocks() {
            let rate = self.problem.rate(machine, block);
            if best.map_or(false, |(_, best_rate)| rate <= best_rate) {
                continue;
            }
            if self.is_feasible(machine, key, block) {
                best = Some((block, rate));
            }
        }
        best.map(|(block, _)| block)
    }

    /// Records the assignment. Slots outside the calendar or the block window only occupy
    /// the machine.
    pub(crate) fn commit(
        &mut self,
        machine: MachineIdx,
        key: ShiftKey,
        block: BlockIdx,
    ) -> Option<SequencingOutcome> {
        if !self.problem.is_available(machine, key) || !self.problem.block_active(block, key.day)
        {
            return None;
        }
        let landing = self.problem.landing_of(block);
        if !self.landing_has_room(machine, key.day, landing) {
            return None;
        }
        self.landing_usage
            .entry((key.day, landing))
            .or_default()
            .insert(machine);
        Some(
            self.tracker
                .process(key.day, machine, block, self.problem.rate(machine, block)),
        )
    }

    pub(crate) fn finalize(&mut self) {
        self.tracker.finalize();
    }
}
