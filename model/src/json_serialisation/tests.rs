use crate::{
    base_types::{LandingIdx, MachineIdx, ShiftIdx, ShiftKey},
    json_serialisation::load_problem_from_json,
    test_utilities::test_scenario_json,
    ModelError,
};

#[test]
fn test_load_from_json() {
    // ACT
    let problem = load_problem_from_json(test_scenario_json()).unwrap();

    // ASSERT
    assert_eq!(problem.name, "two-landings");
    assert_eq!(problem.num_days, 3);
    assert_eq!(problem.shifts, vec!["am", "pm"]);
    assert_eq!(problem.roles, vec!["feller", "skidder"]);
    assert_eq!(problem.blocks.len(), 3);
    assert_eq!(problem.machines.len(), 3);

    let b2 = &problem.blocks[1];
    assert_eq!(b2.id(), "B2");
    assert_eq!(b2.landing(), LandingIdx(0));
    assert_eq!(b2.earliest_start(), 1);
    assert_eq!(b2.latest_finish(), 3);
    assert!(b2.harvest_system().is_none());

    let p1 = &problem.machines[2];
    assert_eq!(p1.role(), None);
    assert_eq!(p1.mobilisation().move_cost_flat, 500.0);
    assert!(!problem
        .calendar
        .is_available(MachineIdx(2), ShiftKey::new(1, ShiftIdx(1))));
    assert_eq!(problem.production_rates.len(), 6);
    assert_eq!(problem.distances.len(), 3);
}

#[test]
fn unknown_landing_is_reported() {
    let mut input = test_scenario_json();
    input["blocks"][0]["landing"] = serde_json::json!("L9");

    let result = load_problem_from_json(input);

    assert_eq!(
        result.err(),
        Some(ModelError::UnknownLanding {
            block: String::from("B1"),
            landing: String::from("L9"),
        })
    );
}

#[test]
fn unknown_harvest_system_is_reported() {
    let mut input = test_scenario_json();
    input["blocks"][1]["harvestSystem"] = serde_json::json!("cable");

    let result = load_problem_from_json(input);

    assert!(matches!(
        result,
        Err(ModelError::UnknownHarvestSystem { ref system, .. }) if system == "cable"
    ));
}

#[test]
fn unknown_prerequisite_role_is_reported() {
    let mut input = test_scenario_json();
    input["harvestSystems"][0]["jobs"][1]["prerequisites"] = serde_json::json!(["processor"]);

    let result = load_problem_from_json(input);

    assert!(matches!(result, Err(ModelError::UnknownRole { ref role, .. }) if role == "processor"));
}

#[test]
fn malformed_document_is_invalid_scenario() {
    let result = load_problem_from_json(serde_json::json!({"numDays": "three"}));
    assert!(matches!(result, Err(ModelError::InvalidScenario(_))));
}

fn with_shifts(count: usize) -> serde_json::Value {
    let mut input = test_scenario_json();
    let mut shifts = vec![String::from("am"), String::from("pm")];
    shifts.extend((2..count).map(|s| format!("s{}", s)));
    input["shifts"] = serde_json::json!(shifts);
    input
}

#[test]
fn shift_count_is_bounded_by_the_index_width() {
    // ACT
    let widest = load_problem_from_json(with_shifts(256));
    let too_wide = load_problem_from_json(with_shifts(257));

    // ASSERT
    let widest = widest.unwrap();
    let keys = widest.shift_keys();
    assert_eq!(keys.len(), 3 * 256);
    assert_ne!(keys[0], keys[256]);
    assert_eq!(keys[255], ShiftKey::new(1, ShiftIdx(255)));
    assert_eq!(
        too_wide.err(),
        Some(ModelError::InvalidScenario(String::from(
            "257 shifts declared, at most 256 supported"
        )))
    );
}
