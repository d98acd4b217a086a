
use std::fmt;

use im::{OrdMap, OrdSet};
use itertools::{EitherOrBoth, Itertools};
use model::base_types::{BlockIdx, MachineIdx, ShiftKey};
use model::OperationalProblem;

/// One slot whose assignment differs between two schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotChange {
    pub machine: MachineIdx,
    pub key: ShiftKey,
    pub before: Option<BlockIdx>,
    pub after: Option<BlockIdx>,
}

/// Assignment of machines to blocks per (day, shift) slot. An empty slot means the machine
/// idles.
///
/// The schedule is immutable in spirit: cloning is cheap (persistent maps), so operators clone
/// the current schedule and modify the copy. Every modification marks the slot as dirty so that
/// a limited repair only needs to look at the touched slots.
#[derive(Clone, Default)]
pub struct Schedule {
    assignments: OrdMap<(MachineIdx, ShiftKey), BlockIdx>,

    // ordered chronologically, then by machine (the replay order of the repair)
    dirty: OrdSet<(ShiftKey, MachineIdx)>,
}

// basic methods
impl Schedule {
    pub fn empty() -> Schedule {
        Schedule::default()
    }

    pub fn assignment(&self, machine: MachineIdx, key: ShiftKey) -> Option<BlockIdx> {
        self.assignments.get(&(machine, key)).copied()
    }

    pub fn is_assigned(&self, machine: MachineIdx, key: ShiftKey) -> bool {
        self.assignments.contains_key(&(machine, key))
    }

    pub fn number_of_assignments(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// All assignments ordered by machine, then chronologically.
    pub fn iter(&self) -> impl Iterator<Item = (MachineIdx, ShiftKey, BlockIdx)> + '_ {
        self.assignments
            .iter()
            .map(|(&(machine, key), &block)| (machine, key, block))
    }

    /// The occupied slots of a single machine in chronological order.
    pub fn occupied_slots(
        &self,
        machine: MachineIdx,
    ) -> impl Iterator<Item = (ShiftKey, BlockIdx)> + '_ {
        self.assignments
            .range((machine, ShiftKey::MIN)..=(machine, ShiftKey::MAX))
            .map(|(&(_, key), &block)| (key, block))
    }

    /// All assignments ordered by (day, shift, machine).
    pub fn chronological(&self) -> Vec<(ShiftKey, MachineIdx, BlockIdx)> {
        self.iter()
            .map(|(machine, key, block)| (key, machine, block))
            .sorted()
            .collect()
    }

    /// The block the machine worked on most recently strictly before the given slot.
    pub fn previous_block(&self, machine: MachineIdx, key: ShiftKey) -> Option<BlockIdx> {
        self.assignments
            .range((machine, ShiftKey::MIN)..(machine, key))
            .next_back()
            .map(|(_, &block)| block)
    }

    /// The block the machine works on next strictly after the given slot.
    pub fn next_block(&self, machine: MachineIdx, key: ShiftKey) -> Option<BlockIdx> {
        self.assignments
            .range((machine, key)..=(machine, ShiftKey::MAX))
            .find(|(&(_, k), _)| k != key)
            .map(|(_, &block)| block)
    }
}

// modifications
impl Schedule {
    /// Sets (or clears with `None`) the assignment of a slot and marks the slot dirty. Returns
    /// the previous assignment.
    pub fn set(
        &mut self,
        machine: MachineIdx,
        key: ShiftKey,
        block: Option<BlockIdx>,
    ) -> Option<BlockIdx> {
        self.dirty.insert((key, machine));
        match block {
            Some(b) => self.assignments.insert((machine, key), b),
            None => self.assignments.remove(&(machine, key)),
        }
    }

    /// Copy of this schedule with one slot changed.
    pub fn with_assignment(
        &self,
        machine: MachineIdx,
        key: ShiftKey,
        block: Option<BlockIdx>,
    ) -> Schedule {
        let mut schedule = self.clone();
        schedule.set(machine, key, block);
        schedule
    }
}

// dirty slots
impl Schedule {
    pub fn is_dirty(&self, machine: MachineIdx, key: ShiftKey) -> bool {
        self.dirty.contains(&(key, machine))
    }

    /// Slots modified since the last `clear_dirty`, ordered by (day, shift, machine).
    pub fn dirty_slots(&self) -> impl Iterator<Item = (ShiftKey, MachineIdx)> + '_ {
        self.dirty.iter().copied()
    }

    pub fn number_of_dirty_slots(&self) -> usize {
        self.dirty.len()
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = OrdSet::new();
    }
}

// comparison
impl Schedule {
    /// All slots whose assignment differs, ordered by machine, then chronologically.
    pub fn diff(&self, other: &Schedule) -> Vec<SlotChange> {
        self.assignments
            .iter()
            .merge_join_by(other.assignments.iter(), |(a, _), (b, _)| a.cmp(b))
            .filter_map(|entry| {
                let (&(machine, key), before, after) = match entry {
                    EitherOrBoth::Both((slot, &a), (_, &b)) => {
                        if a == b {
                            return None;
                        }
                        (slot, Some(a), Some(b))
                    }
                    EitherOrBoth::Left((slot, &a)) => (slot, Some(a), None),
                    EitherOrBoth::Right((slot, &b)) => (slot, None, Some(b)),
                };
                Some(SlotChange {
                    machine,
                    key,
                    before,
                    after,
                })
            })
            .collect()
    }

    pub fn same_assignments(&self, other: &Schedule) -> bool {
        self.assignments == other.assignments
    }
}

impl Schedule {
    pub fn print(&self, problem: &OperationalProblem) {
        println!(
            "** schedule with {} assignments ({} dirty):",
            self.number_of_assignments(),
            self.number_of_dirty_slots()
        );
        for machine in problem.machines() {
            print!("     {}: ", problem.machine_id(machine));
            let slots: Vec<String> = self
                .occupied_slots(machine)
                .map(|(key, block)| format!("{}:{}", key, problem.block_id(block)))
                .collect();
            println!("{}", slots.join(" "));
        }
    }
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .map(|(machine, key, block)| (format!("{}@{}", machine, key), block)),
            )
            .finish()
    }
}
