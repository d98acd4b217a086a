
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use crate::base_types::{
    BlockIdx, Cost, Day, LandingIdx, MachineCount, MachineIdx, Meter, RoleIdx, ShiftKey,
    WorkUnits,
};
use crate::error::ModelError;
use crate::problem::{Block, Problem};

/// Read-only lookup tables derived once from a [`Problem`]. Every search run shares the same
/// instance (behind an `Arc`); nothing in here changes after `build`.
pub struct OperationalProblem {
    problem: Arc<Problem>,
    shift_keys: Vec<ShiftKey>,

    // [machine][position of shift key]
    availability: Vec<Vec<bool>>,

    // [machine][block]
    rates: Vec<Vec<WorkUnits>>,

    // blocks without a harvest system accept every machine (None)
    allowed_roles: Vec<Option<BTreeSet<RoleIdx>>>,
    prerequisites: HashMap<(BlockIdx, RoleIdx), Vec<RoleIdx>>,
    head_starts: HashMap<(BlockIdx, RoleIdx), f64>,
    terminal_roles: HashSet<(BlockIdx, RoleIdx)>,
    volume_flow: Vec<bool>,

    machine_roles: Vec<Option<RoleIdx>>,
    landing_capacity: Vec<MachineCount>,
}

impl OperationalProblem {
    /// Derives all lookup tables. Fails if a block references an undefined harvest system, a
    /// harvest system references roles that are not defined or an entity list is too long for
    /// its index type.
    pub fn build(problem: Arc<Problem>) -> Result<OperationalProblem, ModelError> {
        problem.check_dimensions()?;
        let shift_keys = problem.shift_keys();
        let num_blocks = problem.blocks.len();

        let mut allowed_roles = Vec::with_capacity(num_blocks);
        let mut prerequisites = HashMap::new();
        let mut head_starts = HashMap::new();
        let mut terminal_roles = HashSet::new();
        let mut volume_flow = Vec::with_capacity(num_blocks);

        for (b, block) in problem.blocks.iter().enumerate() {
            let block_idx = BlockIdx::new(b);
            let system = match block.harvest_system() {
                None => {
                    allowed_roles.push(None);
                    volume_flow.push(false);
                    continue;
                }
                Some(s) => problem.systems.get(s.idx()).ok_or_else(|| {
                    ModelError::UnknownHarvestSystem {
                        block: block.id().to_string(),
                        system: s.to_string(),
                    }
                })?,
            };

            let roles: BTreeSet<RoleIdx> = system.jobs().iter().map(|j| j.role()).collect();
            let mut upstream: HashSet<RoleIdx> = HashSet::new();

            for job in system.jobs() {
                let role_name = |r: RoleIdx| {
                    problem
                        .roles
                        .get(r.idx())
                        .cloned()
                        .unwrap_or_else(|| r.to_string())
                };
                if job.role().idx() >= problem.roles.len() {
                    return Err(ModelError::UnknownRole {
                        system: system.id().to_string(),
                        role: role_name(job.role()),
                    });
                }
                if let Some(&missing) = job.prerequisites().iter().find(|p| !roles.contains(p)) {
                    return Err(ModelError::UnknownRole {
                        system: system.id().to_string(),
                        role: role_name(missing),
                    });
                }
                let head_start = job.head_start().unwrap_or(system.head_start());
                if head_start < 0.0 {
                    return Err(ModelError::InvalidHeadStart {
                        system: system.id().to_string(),
                        role: role_name(job.role()),
                        value: head_start,
                    });
                }
                upstream.extend(job.prerequisites().iter().copied());
                prerequisites.insert((block_idx, job.role()), job.prerequisites().to_vec());
                head_starts.insert((block_idx, job.role()), head_start);
            }

            for &role in roles.iter().filter(|r| !upstream.contains(r)) {
                terminal_roles.insert((block_idx, role));
            }
            allowed_roles.push(Some(roles));
            volume_flow.push(system.volume_flow());
        }

        let availability = (0..problem.machines.len())
            .map(|m| {
                shift_keys
                    .iter()
                    .map(|&key| problem.calendar.is_available(MachineIdx::new(m), key))
                    .collect()
            })
            .collect();

        let mut rates = vec![vec![0.0; num_blocks]; problem.machines.len()];
        for (&(machine, block), &rate) in problem.production_rates.iter() {
            if machine.idx() >= problem.machines.len() {
                return Err(ModelError::UnknownMachine(machine.to_string()));
            }
            if block.idx() >= num_blocks {
                return Err(ModelError::UnknownBlock(block.to_string()));
            }
            rates[machine.idx()][block.idx()] = rate.max(0.0);
        }

        let machine_roles = problem.machines.iter().map(|m| m.role()).collect();
        let landing_capacity = problem
            .landings
            .iter()
            .map(|l| l.daily_capacity())
            .collect();

        Ok(OperationalProblem {
            problem,
            shift_keys,
            availability,
            rates,
            allowed_roles,
            prerequisites,
            head_starts,
            terminal_roles,
            volume_flow,
            machine_roles,
            landing_capacity,
        })
    }
}

// basic methods
impl OperationalProblem {
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn shift_keys(&self) -> &[ShiftKey] {
        &self.shift_keys
    }

    pub fn number_of_machines(&self) -> usize {
        self.problem.machines.len()
    }

    pub fn number_of_blocks(&self) -> usize {
        self.problem.blocks.len()
    }

    pub fn machines(&self) -> impl Iterator<Item = MachineIdx> {
        (0..self.number_of_machines()).map(MachineIdx::new)
    }

    pub fn blocks(&self) -> impl Iterator<Item = BlockIdx> {
        (0..self.number_of_blocks()).map(BlockIdx::new)
    }

    pub fn block(&self, block: BlockIdx) -> &Block {
        &self.problem.blocks[block.idx()]
    }

    /// position of the key in `shift_keys()`.
    pub fn key_position(&self, key: ShiftKey) -> Option<usize> {
        let shifts = self.problem.shifts.len();
        if key.day == 0 || key.day > self.problem.num_days || key.shift.idx() >= shifts {
            return None;
        }
        Some((key.day as usize - 1) * shifts + key.shift.idx())
    }

    pub fn is_available(&self, machine: MachineIdx, key: ShiftKey) -> bool {
        match self.key_position(key) {
            Some(pos) => self.availability[machine.idx()][pos],
            None => false,
        }
    }

    pub fn rate(&self, machine: MachineIdx, block: BlockIdx) -> WorkUnits {
        self.rates[machine.idx()][block.idx()]
    }

    pub fn block_active(&self, block: BlockIdx, day: Day) -> bool {
        self.block(block).is_active(day)
    }

    /// machine is available, block is in its window and the machine produces something there.
    pub fn can_work(&self, machine: MachineIdx, block: BlockIdx, key: ShiftKey) -> bool {
        self.is_available(machine, key)
            && self.block_active(block, key.day)
            && self.rate(machine, block) > 0.0
    }

    pub fn allowed_roles(&self, block: BlockIdx) -> Option<&BTreeSet<RoleIdx>> {
        self.allowed_roles[block.idx()].as_ref()
    }

    pub fn prerequisites(&self, block: BlockIdx, role: RoleIdx) -> &[RoleIdx] {
        self.prerequisites
            .get(&(block, role))
            .map(|p| p.as_slice())
            .unwrap_or(&[])
    }

    pub fn head_start(&self, block: BlockIdx, role: RoleIdx) -> f64 {
        self.head_starts.get(&(block, role)).copied().unwrap_or(0.0)
    }

    /// true if no other role of the block's system waits for this role. Blocks without a
    /// system have no terminal roles.
    pub fn is_terminal(&self, block: BlockIdx, role: RoleIdx) -> bool {
        self.terminal_roles.contains(&(block, role))
    }

    pub fn has_volume_flow(&self, block: BlockIdx) -> bool {
        self.volume_flow[block.idx()]
    }

    pub fn machine_role(&self, machine: MachineIdx) -> Option<RoleIdx> {
        self.machine_roles[machine.idx()]
    }

    pub fn landing_of(&self, block: BlockIdx) -> LandingIdx {
        self.block(block).landing()
    }

    pub fn landing_capacity(&self, landing: LandingIdx) -> MachineCount {
        self.landing_capacity[landing.idx()]
    }

    pub fn distance(&self, a: BlockIdx, b: BlockIdx) -> Meter {
        self.problem.distances.get(a, b)
    }

    /// Cost for the machine to relocate from one block to another (0 if it stays).
    pub fn mobilisation_cost(&self, machine: MachineIdx, from: BlockIdx, to: BlockIdx) -> Cost {
        if from == to {
            return 0.0;
        }
        self.problem.machines[machine.idx()]
            .mobilisation()
            .transition_cost(self.distance(from, to))
    }

    pub fn machine_id(&self, machine: MachineIdx) -> &str {
        self.problem.machines[machine.idx()].id()
    }

    pub fn block_id(&self, block: BlockIdx) -> &str {
        self.block(block).id()
    }
}
