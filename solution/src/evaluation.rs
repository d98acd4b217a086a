
use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use model::base_types::{Cost, Day, LandingIdx, MachineIdx, WorkUnits};
use model::OperationalProblem;

use crate::sequencing::{SequencingTracker, Violation};
use crate::Schedule;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ViolationCounts {
    pub unknown_role: usize,
    pub forbidden_role: usize,
    pub missing_prereq: usize,
}

impl ViolationCounts {
    pub fn record(&mut self, violation: Violation) {
        match violation {
            Violation::UnknownRole => self.unknown_role += 1,
            Violation::ForbiddenRole => self.forbidden_role += 1,
            Violation::MissingPrereq => self.missing_prereq += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.unknown_role + self.forbidden_role + self.missing_prereq
    }
}

/// Key figures of a schedule, computed by a full chronological replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleKpis {
    /// volume removed from the blocks (terminal roles, capped by the block's work).
    pub production: WorkUnits,
    pub mobilisation_cost: Cost,
    /// slots of machines exceeding the daily capacity of a landing.
    pub landing_excess: usize,
    pub violations: ViolationCounts,
    /// assigned slots where the machine is unavailable or the block is outside its window.
    pub inactive_slots: usize,
    pub completed_blocks: usize,
    pub assigned_slots: usize,
}

/// Replays the schedule in (day, shift, machine) order through a fresh [`SequencingTracker`].
pub fn evaluate(problem: &OperationalProblem, schedule: &Schedule) -> ScheduleKpis {
    let mut kpis = ScheduleKpis {
        assigned_slots: schedule.number_of_assignments(),
        ..ScheduleKpis::default()
    };

    let mut tracker = SequencingTracker::new(problem);
    let mut landing_usage: HashMap<(Day, LandingIdx), BTreeSet<MachineIdx>> = HashMap::new();

    for (key, machine, block) in schedule.chronological() {
        if !problem.is_available(machine, key) || !problem.block_active(block, key.day) {
            kpis.inactive_slots += 1;
            continue;
        }

        let landing = problem.landing_of(block);
        let usage = landing_usage.entry((key.day, landing)).or_default();
        if !usage.contains(&machine) {
            if usage.len() as u32 >= problem.landing_capacity(landing) {
                kpis.landing_excess += 1;
                continue;
            }
            usage.insert(machine);
        }

        let outcome = tracker.process(key.day, machine, block, problem.rate(machine, block));
        if let Some(violation) = outcome.violation {
            kpis.violations.record(violation);
        }
    }
    tracker.finalize();

    kpis.production = problem
        .blocks()
        .map(|b| problem.block(b).work_required().max(0.0) - tracker.remaining_work(b))
        .sum();
    kpis.completed_blocks = tracker.number_of_completed_blocks();
    kpis.mobilisation_cost = mobilisation_cost(problem, schedule);
    kpis
}

/// Sum over all machines of the transition costs between consecutive distinct blocks. The first
/// placement of a machine is free.
pub fn mobilisation_cost(problem: &OperationalProblem, schedule: &Schedule) -> Cost {
    problem
        .machines()
        .map(|machine| {
            let mut previous = None;
            let mut cost = 0.0;
            for (_, block) in schedule.occupied_slots(machine) {
                if let Some(from) = previous {
                    cost += problem.mobilisation_cost(machine, from, block);
                }
                previous = Some(block);
            }
            cost
        })
        .sum()
}
