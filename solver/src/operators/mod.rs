mod block_insertion;
mod cross_exchange;
mod mobilisation_shake;
mod move_assignment;
mod swap;
#[cfg(test)]
mod tests;

pub use block_insertion::BlockInsertion;
pub use cross_exchange::CrossExchange;
pub use mobilisation_shake::MobilisationShake;
pub use move_assignment::MoveAssignment;
pub use swap::Swap;

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use model::base_types::{MachineIdx, ShiftKey};
use model::OperationalProblem;
use solution::Schedule;

use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::locks::LockedAssignments;
use crate::presets::Preset;

/// Number of random picks an operator makes before it gives up on finding a change.
const ATTEMPTS: usize = 10;

/// Everything an operator may look at while building a neighbor.
pub struct OperatorContext<'a> {
    pub problem: &'a OperationalProblem,
    pub schedule: &'a Schedule,
    pub locks: &'a LockedAssignments,
    pub sanitizer: &'a (dyn Fn(Schedule) -> Schedule + Sync),
    pub rng: &'a mut StdRng,
    /// number of changes for operators that make several (at least 1).
    pub strength: usize,
}

impl<'a> OperatorContext<'a> {
    pub fn random_key(&mut self) -> Option<ShiftKey> {
        let keys = self.problem.shift_keys();
        if keys.is_empty() {
            return None;
        }
        Some(keys[self.rng.gen_range(0..keys.len())])
    }

    pub fn random_machine(&mut self) -> Option<MachineIdx> {
        let machines = self.problem.number_of_machines();
        if machines == 0 {
            return None;
        }
        Some(MachineIdx::new(self.rng.gen_range(0..machines)))
    }

    /// Two distinct machines.
    pub fn random_machine_pair(&mut self) -> Option<(MachineIdx, MachineIdx)> {
        let machines = self.problem.number_of_machines();
        if machines < 2 {
            return None;
        }
        let first = self.rng.gen_range(0..machines);
        let second = (first + self.rng.gen_range(1..machines)) % machines;
        Some((MachineIdx::new(first), MachineIdx::new(second)))
    }

    pub fn is_locked(&self, machine: MachineIdx, key: ShiftKey) -> bool {
        self.locks.is_locked(machine, key)
    }

    /// Sanitizes the modified schedule; `None` if the operator did not change anything.
    pub fn finish(&self, schedule: Schedule) -> Option<Schedule> {
        if schedule.same_assignments(self.schedule) {
            return None;
        }
        Some((self.sanitizer)(schedule))
    }
}

/// A neighborhood move on schedules.
pub trait Operator: Send + Sync {
    fn name(&self) -> &'static str;

    /// weight when neither a preset nor the configuration sets one.
    fn default_weight(&self) -> f64;

    /// Builds a sanitized neighbor of `context.schedule`, or `None` if no change was found.
    fn apply(&self, context: &mut OperatorContext) -> Option<Schedule>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperatorStats {
    pub proposals: u64,
    pub accepted: u64,
    pub improvements: u64,
}

pub type OperatorStatsTable = BTreeMap<String, OperatorStats>;

/// The named, weighted operators of a run. A weight of 0 disables an operator.
pub struct OperatorRegistry {
    operators: Vec<Box<dyn Operator>>,
    weights: Vec<f64>,
}

impl OperatorRegistry {
    pub fn new(operators: Vec<Box<dyn Operator>>) -> OperatorRegistry {
        let weights = operators.iter().map(|o| o.default_weight()).collect();
        OperatorRegistry { operators, weights }
    }

    /// The built-in operators with their default weights (swap and move enabled).
    pub fn with_defaults() -> OperatorRegistry {
        OperatorRegistry::new(vec![
            Box::new(Swap),
            Box::new(MoveAssignment),
            Box::new(BlockInsertion),
            Box::new(CrossExchange),
            Box::new(MobilisationShake),
        ])
    }

    /// Defaults, then the preset of the configuration, then its explicit weights.
    pub fn from_config(config: &SolverConfig) -> Result<OperatorRegistry, SolverError> {
        let mut registry = OperatorRegistry::with_defaults();
        if let Some(name) = &config.preset {
            let preset = crate::presets::find(name)
                .ok_or_else(|| SolverError::UnknownPreset(name.clone()))?;
            registry.apply_preset(preset)?;
        }
        for (operator, weight) in config.operator_weights.resolve()? {
            registry.set_weight(&operator, weight)?;
        }
        Ok(registry)
    }

    pub fn apply_preset(&mut self, preset: &Preset) -> Result<(), SolverError> {
        for &(operator, weight) in preset.weights {
            self.set_weight(operator, weight)?;
        }
        Ok(())
    }

    pub fn set_weight(&mut self, operator: &str, weight: f64) -> Result<(), SolverError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SolverError::InvalidWeight {
                operator: operator.to_string(),
                value: weight.to_string(),
            });
        }
        let position = self
            .operators
            .iter()
            .position(|o| o.name() == operator)
            .ok_or_else(|| SolverError::UnknownOperator(operator.to_string()))?;
        self.weights[position] = weight;
        Ok(())
    }

    pub fn weight(&self, operator: &str) -> Option<f64> {
        self.operators
            .iter()
            .position(|o| o.name() == operator)
            .map(|position| self.weights[position])
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.operators.iter().map(|o| o.name())
    }

    pub fn enabled(&self) -> impl Iterator<Item = (&dyn Operator, f64)> + '_ {
        self.operators
            .iter()
            .zip(self.weights.iter())
            .filter(|(_, &w)| w > 0.0)
            .map(|(o, &w)| (o.as_ref(), w))
    }

    pub fn empty_stats(&self) -> OperatorStatsTable {
        self.names()
            .map(|name| (name.to_string(), OperatorStats::default()))
            .collect()
    }

    /// Roulette-wheel selection among the enabled operators.
    pub fn select(&self, rng: &mut StdRng) -> Option<&dyn Operator> {
        let total: f64 = self.enabled().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return None;
        }
        let mut pick = rng.gen::<f64>() * total;
        let mut last = None;
        for (operator, weight) in self.enabled() {
            if pick < weight {
                return Some(operator);
            }
            pick -= weight;
            last = Some(operator);
        }
        last
    }

    /// Selects an operator and applies it. Returns the operator name with the neighbor.
    pub fn propose(&self, context: &mut OperatorContext) -> Option<(&'static str, Schedule)> {
        let operator = self.select(context.rng)?;
        operator
            .apply(context)
            .map(|schedule| (operator.name(), schedule))
    }
}
