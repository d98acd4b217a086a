
use std::collections::HashMap;

use derive_more::Display;
use serde::Serialize;

use model::base_types::{BlockIdx, Day, MachineIdx, RoleIdx, WorkUnits, WORK_EPSILON};
use model::OperationalProblem;

/// Reason why an assignment does not respect the harvest system of its block.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Violation {
    /// the block has a harvest system but the machine carries no role.
    #[display(fmt = "unknown_role")]
    UnknownRole,
    /// the machine's role is not part of the block's harvest system.
    #[display(fmt = "forbidden_role")]
    ForbiddenRole,
    /// the prerequisite roles have not done enough work on the block yet.
    #[display(fmt = "missing_prereq")]
    MissingPrereq,
}

/// Result of processing a single assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencingOutcome {
    pub production: WorkUnits,
    pub role: Option<RoleIdx>,
    pub violation: Option<Violation>,
    pub block_completed: bool,
}

impl SequencingOutcome {
    pub fn is_violation(&self) -> bool {
        self.violation.is_some()
    }
}

/// Replays assignments in chronological order and decides for each one how much it produces.
///
/// Per (block, role) the tracker keeps the produced volume, the staged inventory (volume flow
/// systems), the number of shifts worked on closed days (`cumulative`) and on the current day
/// (`same_day`). A day is closed as soon as an assignment of a later day is processed or
/// [`SequencingTracker::finalize`] is called; only closed days count for prerequisite checks.
///
/// Assignments must be processed with non-decreasing days.
#[derive(Clone)]
pub struct SequencingTracker<'a> {
    problem: &'a OperationalProblem,
    remaining: Vec<WorkUnits>,
    completed: Vec<bool>,
    produced: HashMap<(BlockIdx, RoleIdx), WorkUnits>,
    inventory: HashMap<(BlockIdx, RoleIdx), WorkUnits>,
    cumulative: HashMap<(BlockIdx, RoleIdx), u32>,
    same_day: HashMap<(BlockIdx, RoleIdx), u32>,
    current_day: Option<Day>,
    finalized: bool,
}

impl<'a> SequencingTracker<'a> {
    pub fn new(problem: &'a OperationalProblem) -> SequencingTracker<'a> {
        let remaining: Vec<WorkUnits> = problem
            .blocks()
            .map(|b| problem.block(b).work_required().max(0.0))
            .collect();
        let completed = remaining.iter().map(|&r| r <= WORK_EPSILON).collect();
        SequencingTracker {
            problem,
            remaining,
            completed,
            produced: HashMap::new(),
            inventory: HashMap::new(),
            cumulative: HashMap::new(),
            same_day: HashMap::new(),
            current_day: None,
            finalized: false,
        }
    }

    /// Decides whether the machine may work on the block at the given day without changing any
    /// state. On success the role under which the machine works is returned (`None` for
    /// blocks without harvest system, where roles do not matter).
    pub fn check(
        &self,
        day: Day,
        machine: MachineIdx,
        block: BlockIdx,
    ) -> Result<Option<RoleIdx>, Violation> {
        let allowed = match self.problem.allowed_roles(block) {
            None => return Ok(None),
            Some(allowed) => allowed,
        };
        let role = self
            .problem
            .machine_role(machine)
            .ok_or(Violation::UnknownRole)?;
        if !allowed.contains(&role) {
            return Err(Violation::ForbiddenRole);
        }

        let prerequisites = self.problem.prerequisites(block, role);
        if prerequisites.is_empty() {
            return Ok(Some(role));
        }

        // a new day closes the current one
        let day_closes = self.current_day != Some(day);
        let closed_shifts = |r: RoleIdx| {
            let cumulative = self.cumulative.get(&(block, r)).copied().unwrap_or(0);
            if day_closes {
                cumulative + self.same_day.get(&(block, r)).copied().unwrap_or(0)
            } else {
                cumulative
            }
        };
        let own_today = if day_closes {
            0
        } else {
            self.same_day.get(&(block, role)).copied().unwrap_or(0)
        };

        let budget = closed_shifts(role) + own_today + 1;
        let required =
            (budget as f64 * (1.0 + self.problem.head_start(block, role)) - WORK_EPSILON).ceil();
        let available = prerequisites
            .iter()
            .map(|&p| closed_shifts(p))
            .min()
            .unwrap_or(0);

        if (available as f64) < required {
            Err(Violation::MissingPrereq)
        } else {
            Ok(Some(role))
        }
    }

    /// Records the assignment and returns the production it is credited with. A violating
    /// assignment produces nothing and changes no counter.
    pub fn process(
        &mut self,
        day: Day,
        machine: MachineIdx,
        block: BlockIdx,
        proposed_production: WorkUnits,
    ) -> SequencingOutcome {
        let problem = self.problem;
        if self.current_day != Some(day) {
            self.close_day();
            self.current_day = Some(day);
        }
        self.finalized = false;

        let role = match self.check(day, machine, block) {
            Ok(role) => role,
            Err(violation) => {
                return SequencingOutcome {
                    production: 0.0,
                    role: problem.machine_role(machine),
                    violation: Some(violation),
                    block_completed: false,
                }
            }
        };

        let production = proposed_production
            .max(0.0)
            .min(self.producible(block, role));

        let reduces_remaining = match role {
            None => true,
            Some(role) => {
                if problem.has_volume_flow(block) {
                    for &p in problem.prerequisites(block, role) {
                        *self.inventory.entry((block, p)).or_insert(0.0) -= production;
                    }
                    *self.inventory.entry((block, role)).or_insert(0.0) += production;
                }
                *self.produced.entry((block, role)).or_insert(0.0) += production;
                *self.same_day.entry((block, role)).or_insert(0) += 1;
                problem.is_terminal(block, role)
            }
        };

        if reduces_remaining {
            let remaining = &mut self.remaining[block.idx()];
            *remaining = (*remaining - production).max(0.0);
        }

        let block_completed =
            !self.completed[block.idx()] && self.remaining[block.idx()] <= WORK_EPSILON;
        if block_completed {
            self.completed[block.idx()] = true;
        }

        SequencingOutcome {
            production,
            role,
            violation: None,
            block_completed,
        }
    }

    /// Closes the current day. Must be called after the last assignment of a replay.
    pub fn finalize(&mut self) {
        self.close_day();
        self.finalized = true;
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    fn close_day(&mut self) {
        for ((block, role), count) in self.same_day.drain() {
            *self.cumulative.entry((block, role)).or_insert(0) += count;
        }
    }
}

// queries
impl<'a> SequencingTracker<'a> {
    /// Work still needed to complete the block.
    pub fn remaining_work(&self, block: BlockIdx) -> WorkUnits {
        self.remaining[block.idx()]
    }

    /// Upper bound on the production a machine of the given role can still achieve on the
    /// block. Roles of a harvest system are bounded by their own progress.
    pub fn remaining_for(&self, block: BlockIdx, role: Option<RoleIdx>) -> WorkUnits {
        match role {
            Some(role) if self.problem.allowed_roles(block).is_some() => {
                let produced = self.produced.get(&(block, role)).copied().unwrap_or(0.0);
                (self.problem.block(block).work_required() - produced).max(0.0)
            }
            _ => self.remaining[block.idx()],
        }
    }

    /// Most a machine of the given role could produce on the block right now: its remaining
    /// work, capped by the staged volume of every prerequisite role on volume flow blocks.
    pub fn producible(&self, block: BlockIdx, role: Option<RoleIdx>) -> WorkUnits {
        let remaining = self.remaining_for(block, role);
        match role {
            Some(role) if self.problem.has_volume_flow(block) => self
                .problem
                .prerequisites(block, role)
                .iter()
                .map(|&p| self.inventory(block, p))
                .fold(remaining, f64::min)
                .max(0.0),
            _ => remaining,
        }
    }

    pub fn is_completed(&self, block: BlockIdx) -> bool {
        self.completed[block.idx()]
    }

    pub fn number_of_completed_blocks(&self) -> usize {
        self.completed.iter().filter(|&&c| c).count()
    }

    /// Staged volume the role left on the block (volume flow systems only).
    pub fn inventory(&self, block: BlockIdx, role: RoleIdx) -> WorkUnits {
        self.inventory.get(&(block, role)).copied().unwrap_or(0.0)
    }

    /// Number of shifts the role worked on the block on closed days.
    pub fn closed_shifts(&self, block: BlockIdx, role: RoleIdx) -> u32 {
        self.cumulative.get(&(block, role)).copied().unwrap_or(0)
    }

    /// Number of shifts the role worked on the block on the current (open) day.
    pub fn open_shifts(&self, block: BlockIdx, role: RoleIdx) -> u32 {
        self.same_day.get(&(block, role)).copied().unwrap_or(0)
    }

    pub fn current_day(&self) -> Option<Day> {
        self.current_day
    }
}
