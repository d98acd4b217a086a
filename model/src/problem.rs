use std::collections::HashMap;

use crate::base_types::{
    BlockIdx, Day, LandingIdx, MachineCount, MachineIdx, RoleIdx, ShiftIdx, ShiftKey, SystemIdx,
    WorkUnits, MAX_ENTITIES, MAX_SHIFTS,
};
use crate::calendar::Calendar;
use crate::error::ModelError;
use crate::mobilisation::{DistanceLookup, MobilisationParams};

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    id: String,
    landing: LandingIdx,
    work_required: WorkUnits,
    earliest_start: Day,
    latest_finish: Day,
    harvest_system: Option<SystemIdx>,
}

impl Block {
    pub fn new(
        id: String,
        landing: LandingIdx,
        work_required: WorkUnits,
        earliest_start: Day,
        latest_finish: Day,
        harvest_system: Option<SystemIdx>,
    ) -> Block {
        Block {
            id,
            landing,
            work_required,
            earliest_start,
            latest_finish,
            harvest_system,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn landing(&self) -> LandingIdx {
        self.landing
    }

    pub fn work_required(&self) -> WorkUnits {
        self.work_required
    }

    pub fn earliest_start(&self) -> Day {
        self.earliest_start
    }

    pub fn latest_finish(&self) -> Day {
        self.latest_finish
    }

    pub fn harvest_system(&self) -> Option<SystemIdx> {
        self.harvest_system
    }

    /// true if the day lies in the (inclusive) time window of the block.
    pub fn is_active(&self, day: Day) -> bool {
        self.earliest_start <= day && day <= self.latest_finish
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Machine {
    id: String,
    role: Option<RoleIdx>,
    mobilisation: MobilisationParams,
}

impl Machine {
    pub fn new(id: String, role: Option<RoleIdx>, mobilisation: MobilisationParams) -> Machine {
        Machine {
            id,
            role,
            mobilisation,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn role(&self) -> Option<RoleIdx> {
        self.role
    }

    pub fn mobilisation(&self) -> &MobilisationParams {
        &self.mobilisation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Landing {
    id: String,
    daily_capacity: MachineCount,
}

impl Landing {
    pub fn new(id: String, daily_capacity: MachineCount) -> Landing {
        Landing { id, daily_capacity }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn daily_capacity(&self) -> MachineCount {
        self.daily_capacity
    }
}

/// One step of a harvest system: the role doing the work and the roles that must have worked on
/// the block before it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleJob {
    role: RoleIdx,
    prerequisites: Vec<RoleIdx>,
    head_start: Option<f64>,
}

impl RoleJob {
    pub fn new(role: RoleIdx, prerequisites: Vec<RoleIdx>, head_start: Option<f64>) -> RoleJob {
        RoleJob {
            role,
            prerequisites,
            head_start,
        }
    }

    pub fn role(&self) -> RoleIdx {
        self.role
    }

    pub fn prerequisites(&self) -> &[RoleIdx] {
        &self.prerequisites
    }

    pub fn head_start(&self) -> Option<f64> {
        self.head_start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarvestSystem {
    id: String,
    jobs: Vec<RoleJob>,
    volume_flow: bool,
    head_start: f64,
}

impl HarvestSystem {
    pub fn new(id: String, jobs: Vec<RoleJob>, volume_flow: bool, head_start: f64) -> HarvestSystem {
        HarvestSystem {
            id,
            jobs,
            volume_flow,
            head_start,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn jobs(&self) -> &[RoleJob] {
        &self.jobs
    }

    /// true if downstream roles consume the staged volume of their prerequisite roles.
    pub fn volume_flow(&self) -> bool {
        self.volume_flow
    }

    /// default head start for jobs that do not specify their own.
    pub fn head_start(&self) -> f64 {
        self.head_start
    }
}

/// The static scenario. Built once (e.g. by the json loader) and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    pub name: String,
    pub num_days: Day,
    pub shifts: Vec<String>,
    pub roles: Vec<String>,
    pub landings: Vec<Landing>,
    pub blocks: Vec<Block>,
    pub machines: Vec<Machine>,
    pub systems: Vec<HarvestSystem>,
    pub calendar: Calendar,
    pub production_rates: HashMap<(MachineIdx, BlockIdx), WorkUnits>,
    pub distances: DistanceLookup,
}

impl Problem {
    /// Fails if an entity list is too long for its index type.
    pub fn check_dimensions(&self) -> Result<(), ModelError> {
        check_dimension("shifts", self.shifts.len(), MAX_SHIFTS)?;
        check_dimension("roles", self.roles.len(), MAX_ENTITIES)?;
        check_dimension("landings", self.landings.len(), MAX_ENTITIES)?;
        check_dimension("blocks", self.blocks.len(), MAX_ENTITIES)?;
        check_dimension("machines", self.machines.len(), MAX_ENTITIES)?;
        check_dimension("harvest systems", self.systems.len(), MAX_ENTITIES)
    }

    pub fn machine_by_id(&self, id: &str) -> Option<MachineIdx> {
        self.machines
            .iter()
            .position(|m| m.id() == id)
            .map(MachineIdx::new)
    }

    pub fn block_by_id(&self, id: &str) -> Option<BlockIdx> {
        self.blocks
            .iter()
            .position(|b| b.id() == id)
            .map(BlockIdx::new)
    }

    pub fn shift_by_id(&self, id: &str) -> Option<ShiftIdx> {
        self.shifts.iter().position(|s| s == id).map(ShiftIdx::new)
    }

    pub fn role_by_name(&self, name: &str) -> Option<RoleIdx> {
        self.roles.iter().position(|r| r == name).map(RoleIdx::new)
    }

    pub fn shift_id(&self, shift: ShiftIdx) -> &str {
        &self.shifts[shift.idx()]
    }

    /// all shift keys of the horizon in chronological order.
    pub fn shift_keys(&self) -> Vec<ShiftKey> {
        (1..=self.num_days)
            .flat_map(|day| {
                (0..self.shifts.len()).map(move |s| ShiftKey::new(day, ShiftIdx::new(s)))
            })
            .collect()
    }
}

pub(crate) fn check_dimension(kind: &str, count: usize, max: usize) -> Result<(), ModelError> {
    if count > max {
        Err(ModelError::InvalidScenario(format!(
            "{} {} declared, at most {} supported",
            count, kind, max
        )))
    } else {
        Ok(())
    }
}
