use std::sync::Arc;

use crate::{
    base_types::{BlockIdx, LandingIdx, MachineIdx, RoleIdx, ShiftIdx, ShiftKey},
    json_serialisation::load_problem_from_json,
    operational_problem::OperationalProblem,
};

/// Small scenario used throughout the tests of all crates:
///
/// - 3 days with shifts `am`, `pm`
/// - landing `L1` (2 machines per day) and `L2` (1 machine per day)
/// - `B1` (L1, 40 units, harvest system `ground`: feller -> skidder, with volume flow)
/// - `B2` (L1, 30 units, no system), `B3` (L2, 20 units, days 2-3, no system)
/// - `F1` (feller), `S1` (skidder), `P1` (no role, unavailable on day 1 pm)
pub struct TestData {
    pub problem: Arc<OperationalProblem>,
    pub b1: BlockIdx,
    pub b2: BlockIdx,
    pub b3: BlockIdx,
    pub f1: MachineIdx,
    pub s1: MachineIdx,
    pub p1: MachineIdx,
    pub l1: LandingIdx,
    pub l2: LandingIdx,
    pub feller: RoleIdx,
    pub skidder: RoleIdx,
}

impl TestData {
    pub fn key(&self, day: u32, shift: usize) -> ShiftKey {
        ShiftKey::new(day, ShiftIdx::new(shift))
    }
}

pub fn test_scenario_json() -> serde_json::Value {
    serde_json::json!({
        "name": "two-landings",
        "numDays": 3,
        "shifts": ["am", "pm"],
        "landings": [
            {"id": "L1", "dailyCapacity": 2},
            {"id": "L2", "dailyCapacity": 1}
        ],
        "harvestSystems": [
            {
                "id": "ground",
                "volumeFlow": true,
                "jobs": [
                    {"role": "feller"},
                    {"role": "skidder", "prerequisites": ["feller"]}
                ]
            }
        ],
        "blocks": [
            {"id": "B1", "landing": "L1", "work": 40.0, "earliestStart": 1, "latestFinish": 3, "harvestSystem": "ground"},
            {"id": "B2", "landing": "L1", "work": 30.0},
            {"id": "B3", "landing": "L2", "work": 20.0, "earliestStart": 2, "latestFinish": 3}
        ],
        "machines": [
            {"id": "F1", "role": "feller"},
            {"id": "S1", "role": "skidder"},
            {
                "id": "P1",
                "mobilisation": {
                    "walkCostPerMetre": 2.0,
                    "moveCostFlat": 500.0,
                    "walkThresholdMetres": 100.0,
                    "setupCost": 50.0
                }
            }
        ],
        "calendar": [
            {"machine": "P1", "day": 1, "shift": "pm", "available": false}
        ],
        "productionRates": [
            {"machine": "F1", "block": "B1", "rate": 20.0},
            {"machine": "F1", "block": "B2", "rate": 10.0},
            {"machine": "S1", "block": "B1", "rate": 25.0},
            {"machine": "S1", "block": "B2", "rate": 10.0},
            {"machine": "P1", "block": "B2", "rate": 15.0},
            {"machine": "P1", "block": "B3", "rate": 10.0}
        ],
        "distances": [
            {"from": "B1", "to": "B2", "metres": 80.0},
            {"from": "B2", "to": "B3", "metres": 300.0},
            {"from": "B1", "to": "B3", "metres": 400.0}
        ]
    })
}

/// Loads and builds a scenario; variations of [`test_scenario_json`] keep its indices as long
/// as the declaration order is unchanged.
pub fn build_test_problem(scenario: serde_json::Value) -> Arc<OperationalProblem> {
    let problem = load_problem_from_json(scenario).expect("test scenario is valid");
    Arc::new(OperationalProblem::build(Arc::new(problem)).expect("test scenario builds"))
}

pub fn init_test_data() -> TestData {
    let problem = build_test_problem(test_scenario_json());
    let p = problem.problem();
    TestData {
        b1: p.block_by_id("B1").unwrap(),
        b2: p.block_by_id("B2").unwrap(),
        b3: p.block_by_id("B3").unwrap(),
        f1: p.machine_by_id("F1").unwrap(),
        s1: p.machine_by_id("S1").unwrap(),
        p1: p.machine_by_id("P1").unwrap(),
        l1: LandingIdx(0),
        l2: LandingIdx(1),
        feller: p.role_by_name("feller").unwrap(),
        skidder: p.role_by_name("skidder").unwrap(),
        problem: problem.clone(),
    }
}
