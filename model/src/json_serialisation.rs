#[cfg(test)]
mod tests;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::base_types::{
    BlockIdx, Day, LandingIdx, MachineCount, RoleIdx, ShiftKey, SystemIdx, WorkUnits,
    MAX_ENTITIES, MAX_SHIFTS,
};
use crate::calendar::Calendar;
use crate::error::ModelError;
use crate::mobilisation::{DistanceLookup, MobilisationParams};
use crate::problem::{
    check_dimension, Block, HarvestSystem, Landing, Machine, Problem, RoleJob,
};

type Float = f64;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonLanding {
    id: String,
    daily_capacity: MachineCount,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonRoleJob {
    role: String,
    #[serde(default)]
    prerequisites: Vec<String>,
    head_start: Option<Float>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonHarvestSystem {
    id: String,
    jobs: Vec<JsonRoleJob>,
    #[serde(default)]
    volume_flow: bool,
    #[serde(default)]
    head_start: Float,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonBlock {
    id: String,
    landing: String,
    work: WorkUnits,
    earliest_start: Option<Day>,
    latest_finish: Option<Day>,
    harvest_system: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct JsonMobilisation {
    #[serde(default)]
    walk_cost_per_metre: Float,
    #[serde(default)]
    move_cost_flat: Float,
    #[serde(default)]
    walk_threshold_metres: Float,
    #[serde(default)]
    setup_cost: Float,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonMachine {
    id: String,
    role: Option<String>,
    #[serde(default)]
    mobilisation: JsonMobilisation,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonCalendarEntry {
    machine: String,
    day: Day,
    shift: Option<String>,
    available: bool,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonProductionRate {
    machine: String,
    block: String,
    rate: WorkUnits,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonDistance {
    from: String,
    to: String,
    metres: Float,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct JsonInput {
    #[serde(default)]
    name: String,
    num_days: Day,
    shifts: Vec<String>,
    landings: Vec<JsonLanding>,
    #[serde(default)]
    harvest_systems: Vec<JsonHarvestSystem>,
    blocks: Vec<JsonBlock>,
    machines: Vec<JsonMachine>,
    #[serde(default)]
    calendar: Vec<JsonCalendarEntry>,
    production_rates: Vec<JsonProductionRate>,
    #[serde(default)]
    distances: Vec<JsonDistance>,
}

/// Builds the static problem from a scenario document. Unknown references are reported as
/// [`ModelError`]s.
pub fn load_problem_from_json(input_data: serde_json::Value) -> Result<Problem, ModelError> {
    let json_input: JsonInput = serde_json::from_value(input_data)
        .map_err(|err| ModelError::InvalidScenario(err.to_string()))?;

    if json_input.shifts.is_empty() {
        return Err(ModelError::InvalidScenario(String::from(
            "at least one shift must be declared",
        )));
    }

    let roles = create_roles(&json_input);
    check_dimension("shifts", json_input.shifts.len(), MAX_SHIFTS)?;
    check_dimension("roles", roles.len(), MAX_ENTITIES)?;
    check_dimension("landings", json_input.landings.len(), MAX_ENTITIES)?;
    check_dimension("blocks", json_input.blocks.len(), MAX_ENTITIES)?;
    check_dimension("machines", json_input.machines.len(), MAX_ENTITIES)?;
    check_dimension("harvest systems", json_input.harvest_systems.len(), MAX_ENTITIES)?;

    let role_idx = |name: &str| -> Option<RoleIdx> {
        roles.iter().position(|r| r == name).map(RoleIdx::new)
    };

    let landings: Vec<Landing> = json_input
        .landings
        .iter()
        .map(|l| Landing::new(l.id.clone(), l.daily_capacity))
        .collect();

    let mut systems = Vec::new();
    for system in json_input.harvest_systems.iter() {
        let mut jobs = Vec::new();
        for job in system.jobs.iter() {
            let unknown_role = |role: &str| ModelError::UnknownRole {
                system: system.id.clone(),
                role: role.to_string(),
            };
            let role = role_idx(&job.role).ok_or_else(|| unknown_role(&job.role))?;
            let prerequisites = job
                .prerequisites
                .iter()
                .map(|p| role_idx(p).ok_or_else(|| unknown_role(p)))
                .collect::<Result<Vec<_>, _>>()?;
            jobs.push(RoleJob::new(role, prerequisites, job.head_start));
        }
        systems.push(HarvestSystem::new(
            system.id.clone(),
            jobs,
            system.volume_flow,
            system.head_start,
        ));
    }

    let mut blocks = Vec::new();
    for block in json_input.blocks.iter() {
        let landing = json_input
            .landings
            .iter()
            .position(|l| l.id == block.landing)
            .map(LandingIdx::new)
            .ok_or_else(|| ModelError::UnknownLanding {
                block: block.id.clone(),
                landing: block.landing.clone(),
            })?;
        let harvest_system = match &block.harvest_system {
            None => None,
            Some(system_id) => Some(
                json_input
                    .harvest_systems
                    .iter()
                    .position(|s| &s.id == system_id)
                    .map(SystemIdx::new)
                    .ok_or_else(|| ModelError::UnknownHarvestSystem {
                        block: block.id.clone(),
                        system: system_id.clone(),
                    })?,
            ),
        };
        blocks.push(Block::new(
            block.id.clone(),
            landing,
            block.work,
            block.earliest_start.unwrap_or(1),
            block.latest_finish.unwrap_or(json_input.num_days),
            harvest_system,
        ));
    }

    let machines: Vec<Machine> = json_input
        .machines
        .iter()
        .map(|m| {
            Machine::new(
                m.id.clone(),
                m.role.as_deref().and_then(role_idx),
                MobilisationParams {
                    walk_cost_per_metre: m.mobilisation.walk_cost_per_metre,
                    move_cost_flat: m.mobilisation.move_cost_flat,
                    walk_threshold: m.mobilisation.walk_threshold_metres,
                    setup_cost: m.mobilisation.setup_cost,
                },
            )
        })
        .collect();

    let mut problem = Problem {
        name: json_input.name.clone(),
        num_days: json_input.num_days,
        shifts: json_input.shifts.clone(),
        roles,
        landings,
        blocks,
        machines,
        systems,
        calendar: Calendar::new(),
        production_rates: HashMap::new(),
        distances: DistanceLookup::new(),
    };

    for entry in json_input.calendar.iter() {
        let machine = machine_idx(&problem, &entry.machine)?;
        match &entry.shift {
            None => problem.calendar.set_day(machine, entry.day, entry.available),
            Some(shift_id) => {
                let shift = problem
                    .shift_by_id(shift_id)
                    .ok_or_else(|| ModelError::UnknownShift(shift_id.clone()))?;
                problem.calendar.set_shift(
                    machine,
                    ShiftKey::new(entry.day, shift),
                    entry.available,
                );
            }
        }
    }

    for rate in json_input.production_rates.iter() {
        let machine = machine_idx(&problem, &rate.machine)?;
        let block = block_idx(&problem, &rate.block)?;
        problem.production_rates.insert((machine, block), rate.rate);
    }

    for distance in json_input.distances.iter() {
        let from = block_idx(&problem, &distance.from)?;
        let to = block_idx(&problem, &distance.to)?;
        problem.distances.insert(from, to, distance.metres);
    }

    Ok(problem)
}

/// roles in order of first appearance (systems first, then machine tags).
fn create_roles(json_input: &JsonInput) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();
    let names = json_input
        .harvest_systems
        .iter()
        .flat_map(|s| s.jobs.iter().map(|j| j.role.as_str()))
        .chain(json_input.machines.iter().filter_map(|m| m.role.as_deref()));
    for name in names {
        if !roles.iter().any(|r| r == name) {
            roles.push(name.to_string());
        }
    }
    roles
}

fn machine_idx(problem: &Problem, id: &str) -> Result<crate::base_types::MachineIdx, ModelError> {
    problem
        .machine_by_id(id)
        .ok_or_else(|| ModelError::UnknownMachine(id.to_string()))
}

fn block_idx(problem: &Problem, id: &str) -> Result<BlockIdx, ModelError> {
    problem
        .block_by_id(id)
        .ok_or_else(|| ModelError::UnknownBlock(id.to_string()))
}
