
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use solution::json_serialisation::AssignmentRow;

use crate::error::SolverError;
use crate::operators::OperatorRegistry;
use crate::presets::{self, Preset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Algorithm {
    #[default]
    #[serde(rename = "sa", alias = "simulated_annealing")]
    SimulatedAnnealing,
    #[serde(rename = "ils", alias = "iterated_local_search")]
    IteratedLocalSearch,
    #[serde(rename = "tabu", alias = "tabu_search")]
    TabuSearch,
}

/// How the local search of iterated local search picks its next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalImproverKind {
    /// the first improving sample.
    #[default]
    TakeFirst,
    /// the best of all samples, evaluated in parallel.
    Best,
}

/// Operator weights, either as `{"swap": 1.0}` or as `["swap=1.0"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperatorWeights {
    Map(BTreeMap<String, serde_json::Value>),
    List(Vec<String>),
}

impl Default for OperatorWeights {
    fn default() -> Self {
        OperatorWeights::Map(BTreeMap::new())
    }
}

impl OperatorWeights {
    /// The weights as numbers (in the given order). Non-numeric values fail.
    pub fn resolve(&self) -> Result<Vec<(String, f64)>, SolverError> {
        match self {
            OperatorWeights::Map(map) => map
                .iter()
                .map(|(operator, value)| {
                    value
                        .as_f64()
                        .map(|weight| (operator.clone(), weight))
                        .ok_or_else(|| SolverError::InvalidWeight {
                            operator: operator.clone(),
                            value: value.to_string(),
                        })
                })
                .collect(),
            OperatorWeights::List(list) => {
                list.iter().map(|entry| parse_operator_weight(entry)).collect()
            }
        }
    }
}

/// Parses `name=value`, e.g. `swap=1.5`.
pub fn parse_operator_weight(entry: &str) -> Result<(String, f64), SolverError> {
    let (name, value) = entry.split_once('=').ok_or_else(|| {
        SolverError::InvalidConfig(format!("operator weight '{}' is not of the form name=value", entry))
    })?;
    let name = name.trim();
    let weight = value
        .trim()
        .parse::<f64>()
        .map_err(|_| SolverError::InvalidWeight {
            operator: name.to_string(),
            value: value.trim().to_string(),
        })?;
    Ok((name.to_string(), weight))
}

/// A lock of a machine to a block. Without a shift the lock covers every available shift of
/// the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedAssignmentConfig {
    pub machine: String,
    pub block: String,
    pub day: u32,
    pub shift: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MultiStartConfig {
    pub runs: usize,
    pub presets: Vec<String>,
    pub max_workers: Option<usize>,
}

impl Default for MultiStartConfig {
    fn default() -> Self {
        MultiStartConfig {
            runs: 1,
            presets: Vec::new(),
            max_workers: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SolverConfig {
    pub algorithm: Algorithm,
    pub iterations: usize,
    pub seed: u64,
    pub batch_size: Option<usize>,
    pub workers: Option<usize>,
    pub operator_weights: OperatorWeights,
    pub preset: Option<String>,
    pub landing_penalty: f64,
    pub restart_interval: usize,
    pub snapshot_interval: usize,
    pub perturbation_strength: Option<usize>,
    pub local_search_steps: usize,
    pub local_search_samples: usize,
    pub local_improver: LocalImproverKind,
    pub tabu_tenure: Option<usize>,
    pub tabu_candidates: usize,
    pub locked_assignments: Vec<LockedAssignmentConfig>,
    /// warm start: rows of a previous result replace the greedy construction.
    pub initial_assignments: Vec<AssignmentRow>,
    pub multi_start: MultiStartConfig,
    pub scenario_name: Option<String>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            algorithm: Algorithm::SimulatedAnnealing,
            iterations: 1000,
            seed: 1,
            batch_size: None,
            workers: None,
            operator_weights: OperatorWeights::default(),
            preset: None,
            landing_penalty: 1000.0,
            restart_interval: 100,
            snapshot_interval: 50,
            perturbation_strength: None,
            local_search_steps: 25,
            local_search_samples: 16,
            local_improver: LocalImproverKind::TakeFirst,
            tabu_tenure: None,
            tabu_candidates: 8,
            locked_assignments: Vec::new(),
            initial_assignments: Vec::new(),
            multi_start: MultiStartConfig::default(),
            scenario_name: None,
            verbose: false,
        }
    }
}

impl SolverConfig {
    /// Parses and validates a configuration document.
    pub fn from_json(value: serde_json::Value) -> Result<SolverConfig, SolverError> {
        let config: SolverConfig = serde_json::from_value(value)
            .map_err(|err| SolverError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Fails on unknown presets, unknown operators, non-numeric or negative weights and
    /// nonsensical numbers.
    pub fn validate(&self) -> Result<(), SolverError> {
        if let Some(name) = &self.preset {
            presets::find(name).ok_or_else(|| SolverError::UnknownPreset(name.clone()))?;
        }
        for name in self.multi_start.presets.iter() {
            presets::find(name).ok_or_else(|| SolverError::UnknownPreset(name.clone()))?;
        }
        OperatorRegistry::from_config(self)?;
        if !self.landing_penalty.is_finite() || self.landing_penalty < 0.0 {
            return Err(SolverError::InvalidConfig(format!(
                "landing penalty must be a non-negative number, got {}",
                self.landing_penalty
            )));
        }
        if self.workers == Some(0) || self.multi_start.max_workers == Some(0) {
            return Err(SolverError::InvalidConfig(String::from(
                "worker counts must be positive",
            )));
        }
        Ok(())
    }

    pub fn preset_definition(&self) -> Option<&'static Preset> {
        self.preset.as_deref().and_then(presets::find)
    }

    /// Number of candidates evaluated per batch. 0 and 1 both mean sequential.
    pub fn batch_size(&self) -> usize {
        self.batch_size
            .or_else(|| self.preset_definition().and_then(|p| p.batch_size))
            .unwrap_or(0)
    }

    pub fn workers(&self) -> usize {
        self.workers
            .or_else(|| self.preset_definition().and_then(|p| p.workers))
            .unwrap_or(1)
    }

    pub fn perturbation_strength(&self) -> usize {
        self.perturbation_strength
            .or_else(|| self.preset_definition().and_then(|p| p.perturbation_strength))
            .unwrap_or(3)
            .max(1)
    }

    /// Tabu tenure; derived from the fleet size when neither the configuration nor the preset
    /// sets it.
    pub fn tabu_tenure(&self, number_of_machines: usize) -> usize {
        self.tabu_tenure
            .or_else(|| self.preset_definition().and_then(|p| p.tabu_tenure))
            .filter(|&tenure| tenure > 0)
            .unwrap_or_else(|| (number_of_machines / 4).clamp(5, 30))
    }

    /// Copy for one attempt of a multi-start run.
    pub fn for_attempt(&self, seed: u64, preset: Option<String>) -> SolverConfig {
        SolverConfig {
            seed,
            preset,
            multi_start: MultiStartConfig::default(),
            ..self.clone()
        }
    }
}
