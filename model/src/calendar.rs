use std::collections::HashMap;

use crate::base_types::{Day, MachineIdx, ShiftKey};

/// Machine availability. Entries for a specific shift override entries for the whole day;
/// anything not mentioned is available.
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    by_day: HashMap<(MachineIdx, Day), bool>,
    by_shift: HashMap<(MachineIdx, ShiftKey), bool>,
}

impl Calendar {
    pub fn new() -> Calendar {
        Calendar::default()
    }

    pub fn set_day(&mut self, machine: MachineIdx, day: Day, available: bool) {
        self.by_day.insert((machine, day), available);
    }

    pub fn set_shift(&mut self, machine: MachineIdx, key: ShiftKey, available: bool) {
        self.by_shift.insert((machine, key), available);
    }

    pub fn is_available(&self, machine: MachineIdx, key: ShiftKey) -> bool {
        if let Some(&available) = self.by_shift.get(&(machine, key)) {
            return available;
        }
        self.by_day
            .get(&(machine, key.day))
            .copied()
            .unwrap_or(true)
    }
}
