#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

use model::base_types::{BlockIdx, MachineIdx, ShiftIdx, ShiftKey};
use model::OperationalProblem;
use solution::Schedule;

use crate::config::LockedAssignmentConfig;
use crate::error::SolverError;

/// Slots whose assignment is fixed by the user. Operators and the repair engine never touch
/// them; the sanitizer re-imposes them on every candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LockedAssignments {
    slots: BTreeMap<(MachineIdx, ShiftKey), BlockIdx>,
}

impl LockedAssignments {
    pub fn none() -> LockedAssignments {
        LockedAssignments::default()
    }

    /// Resolves the ids of the configuration. A lock without shift covers every available
    /// shift of its day.
    pub fn from_config(
        problem: &OperationalProblem,
        entries: &[LockedAssignmentConfig],
    ) -> Result<LockedAssignments, SolverError> {
        let p = problem.problem();
        let mut slots = BTreeMap::new();
        for entry in entries.iter() {
            let machine = p
                .machine_by_id(&entry.machine)
                .ok_or_else(|| SolverError::InvalidLock(format!("unknown machine '{}'", entry.machine)))?;
            let block = p
                .block_by_id(&entry.block)
                .ok_or_else(|| SolverError::InvalidLock(format!("unknown block '{}'", entry.block)))?;
            if entry.day == 0 || entry.day > p.num_days {
                return Err(SolverError::InvalidLock(format!(
                    "day {} is outside of the horizon 1..={}",
                    entry.day, p.num_days
                )));
            }
            let keys: Vec<ShiftKey> = match &entry.shift {
                Some(shift_id) => {
                    let shift = p.shift_by_id(shift_id).ok_or_else(|| {
                        SolverError::InvalidLock(format!("unknown shift '{}'", shift_id))
                    })?;
                    vec![ShiftKey::new(entry.day, shift)]
                }
                None => (0..p.shifts.len())
                    .map(|s| ShiftKey::new(entry.day, ShiftIdx::new(s)))
                    .filter(|&key| problem.is_available(machine, key))
                    .collect(),
            };
            for key in keys {
                if let Some(other) = slots.insert((machine, key), block) {
                    if other != block {
                        return Err(SolverError::InvalidLock(format!(
                            "machine '{}' is locked to '{}' and '{}' on {}",
                            entry.machine,
                            problem.block_id(other),
                            entry.block,
                            key
                        )));
                    }
                }
            }
        }
        Ok(LockedAssignments { slots })
    }

    pub fn is_locked(&self, machine: MachineIdx, key: ShiftKey) -> bool {
        self.slots.contains_key(&(machine, key))
    }

    pub fn block(&self, machine: MachineIdx, key: ShiftKey) -> Option<BlockIdx> {
        self.slots.get(&(machine, key)).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MachineIdx, ShiftKey, BlockIdx)> + '_ {
        self.slots.iter().map(|(&(m, k), &b)| (m, k, b))
    }

    /// Writes every lock into the schedule (only slots that differ are touched).
    pub fn impose(&self, schedule: &mut Schedule) {
        for (machine, key, block) in self.iter() {
            if schedule.assignment(machine, key) != Some(block) {
                schedule.set(machine, key, Some(block));
            }
        }
    }

    pub fn is_respected_by(&self, schedule: &Schedule) -> bool {
        self.iter()
            .all(|(machine, key, block)| schedule.assignment(machine, key) == Some(block))
    }
}
