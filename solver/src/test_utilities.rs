use std::sync::Arc;

use model::base_types::{BlockIdx, MachineIdx, ShiftKey};
use model::test_utilities::{build_test_problem, test_scenario_json, TestData};
use model::OperationalProblem;
use solution::json_serialisation::AssignmentRow;
use solution::Schedule;

use crate::config::{LockedAssignmentConfig, SolverConfig};
use crate::locks::LockedAssignments;
use crate::setup::{RunHooks, SearchSetup};

pub(crate) fn config(iterations: usize, seed: u64) -> SolverConfig {
    SolverConfig {
        iterations,
        seed,
        ..SolverConfig::default()
    }
}

pub(crate) fn setup(d: &TestData, config: SolverConfig) -> Arc<SearchSetup> {
    setup_with_hooks(d, config, RunHooks::default())
}

pub(crate) fn setup_with_hooks(
    d: &TestData,
    config: SolverConfig,
    hooks: RunHooks,
) -> Arc<SearchSetup> {
    Arc::new(SearchSetup::new(d.problem.clone(), config, hooks).expect("valid test config"))
}

pub(crate) fn lock(machine: &str, block: &str, day: u32, shift: Option<&str>) -> LockedAssignmentConfig {
    LockedAssignmentConfig {
        machine: machine.to_string(),
        block: block.to_string(),
        day,
        shift: shift.map(|s| s.to_string()),
    }
}

/// The greedy construction on the test scenario (objective 90, every block completed):
///
/// | machine | day 1  | day 2  | day 3 |
/// |---------|--------|--------|-------|
/// | F1      | B1, B1 | B2, -  | -, -  |
/// | S1      | B2, B2 | B1, B1 | -, -  |
/// | P1      | -, -   | B3, B3 | -, -  |
pub(crate) fn greedy_assignments(d: &TestData) -> Vec<(MachineIdx, ShiftKey, BlockIdx)> {
    let mut assignments = vec![
        (d.f1, d.key(1, 0), d.b1),
        (d.f1, d.key(1, 1), d.b1),
        (d.f1, d.key(2, 0), d.b2),
        (d.s1, d.key(1, 0), d.b2),
        (d.s1, d.key(1, 1), d.b2),
        (d.s1, d.key(2, 0), d.b1),
        (d.s1, d.key(2, 1), d.b1),
        (d.p1, d.key(2, 0), d.b3),
        (d.p1, d.key(2, 1), d.b3),
    ];
    assignments.sort();
    assignments
}

pub(crate) fn greedy_schedule(d: &TestData) -> Schedule {
    let mut schedule = Schedule::empty();
    for (machine, key, block) in greedy_assignments(d) {
        schedule.set(machine, key, Some(block));
    }
    schedule.clear_dirty();
    schedule
}

/// The test scenario where F1 may also fell on B3 (rate 5) and is locked there on day 2 pm.
/// The lock claims the only place at L2 for that day.
pub(crate) fn feller_locked_on_l2(
    d: &TestData,
) -> (Arc<OperationalProblem>, Arc<LockedAssignments>) {
    let mut scenario = test_scenario_json();
    if let Some(rates) = scenario["productionRates"].as_array_mut() {
        rates.push(serde_json::json!({"machine": "F1", "block": "B3", "rate": 5.0}));
    }
    let problem = build_test_problem(scenario);
    assert_eq!(problem.rate(d.f1, d.b3), 5.0);
    let locks = LockedAssignments::from_config(&problem, &[lock("F1", "B3", 2, Some("pm"))])
        .expect("valid lock");
    (problem, Arc::new(locks))
}

/// One machine and two blocks with work for far more than the horizon: `SLOW` (rate 10) and
/// `FAST` (rate 20) at different landings. The warm start keeps the machine on `SLOW` in all
/// six shifts, which repair leaves as it is (objective 60; all on `FAST` gives 120).
pub(crate) fn slow_start_setup(config: SolverConfig) -> Arc<SearchSetup> {
    let problem = build_test_problem(serde_json::json!({
        "name": "slow-start",
        "numDays": 3,
        "shifts": ["am", "pm"],
        "landings": [
            {"id": "L1", "dailyCapacity": 1},
            {"id": "L2", "dailyCapacity": 1}
        ],
        "blocks": [
            {"id": "SLOW", "landing": "L1", "work": 1000.0},
            {"id": "FAST", "landing": "L2", "work": 1000.0}
        ],
        "machines": [{"id": "M1"}],
        "productionRates": [
            {"machine": "M1", "block": "SLOW", "rate": 10.0},
            {"machine": "M1", "block": "FAST", "rate": 20.0}
        ],
        "distances": [{"from": "SLOW", "to": "FAST", "metres": 50.0}]
    }));
    let initial_assignments = (1..=3)
        .flat_map(|day| {
            ["am", "pm"].into_iter().map(move |shift| AssignmentRow {
                machine_id: String::from("M1"),
                block_id: String::from("SLOW"),
                day,
                shift_id: String::from(shift),
                assigned: 1,
            })
        })
        .collect();
    let config = SolverConfig {
        preset: Some(String::from("explore")),
        initial_assignments,
        ..config
    };
    Arc::new(SearchSetup::new(problem, config, RunHooks::default()).expect("valid test config"))
}
