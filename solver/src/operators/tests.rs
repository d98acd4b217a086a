use rand::rngs::StdRng;
use rand::SeedableRng;

use model::test_utilities::{init_test_data, TestData};
use solution::test_utilities::default_schedule;
use solution::Schedule;

use super::{
    BlockInsertion, CrossExchange, MobilisationShake, MoveAssignment, Operator, OperatorContext,
    OperatorRegistry, Swap,
};
use crate::config::{LockedAssignmentConfig, OperatorWeights, SolverConfig};
use crate::error::SolverError;
use crate::locks::LockedAssignments;
use crate::presets;

/// Applies the operator with 30 different seeds on the default schedule, without repair.
fn apply_many(
    d: &TestData,
    operator: &dyn Operator,
    locks: &LockedAssignments,
    strength: usize,
) -> Vec<Schedule> {
    let schedule = default_schedule(d);
    let identity = |s: Schedule| s;
    (0..30)
        .filter_map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut context = OperatorContext {
                problem: &d.problem,
                schedule: &schedule,
                locks,
                sanitizer: &identity,
                rng: &mut rng,
                strength,
            };
            operator.apply(&mut context)
        })
        .collect()
}

fn lock_everything(d: &TestData) -> LockedAssignments {
    let entries: Vec<LockedAssignmentConfig> = default_schedule(d)
        .iter()
        .map(|(machine, key, block)| LockedAssignmentConfig {
            machine: d.problem.machine_id(machine).to_string(),
            block: d.problem.block_id(block).to_string(),
            day: key.day,
            shift: Some(d.problem.problem().shift_id(key.shift).to_string()),
        })
        .collect();
    LockedAssignments::from_config(&d.problem, &entries).unwrap()
}

#[test]
fn swap_exchanges_two_machines_in_one_shift() {
    // ARRANGE
    let d = init_test_data();
    let original = default_schedule(&d);

    // ACT
    let neighbors = apply_many(&d, &Swap, &LockedAssignments::none(), 1);

    // ASSERT
    assert!(!neighbors.is_empty());
    for neighbor in neighbors {
        let changes = original.diff(&neighbor);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].key, changes[1].key);
        assert_ne!(changes[0].machine, changes[1].machine);
        assert_eq!(changes[0].before, changes[1].after);
        assert_eq!(changes[1].before, changes[0].after);
    }
}

#[test]
fn move_relocates_one_assignment_of_a_machine() {
    // ARRANGE
    let d = init_test_data();
    let original = default_schedule(&d);

    // ACT
    let neighbors = apply_many(&d, &MoveAssignment, &LockedAssignments::none(), 1);

    // ASSERT
    assert!(!neighbors.is_empty());
    for neighbor in neighbors {
        let changes = original.diff(&neighbor);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].machine, changes[1].machine);
        let source = changes.iter().find(|c| c.after.is_none()).unwrap();
        let target = changes.iter().find(|c| c.after.is_some()).unwrap();
        assert_eq!(target.after, source.before);
        assert!(d.problem.is_available(target.machine, target.key));
    }
}

#[test]
fn block_insertion_puts_a_machine_on_a_workable_block() {
    // ARRANGE
    let d = init_test_data();
    let original = default_schedule(&d);

    // ACT
    let neighbors = apply_many(&d, &BlockInsertion, &LockedAssignments::none(), 1);

    // ASSERT
    assert!(!neighbors.is_empty());
    for neighbor in neighbors {
        let changes = original.diff(&neighbor);
        assert_eq!(changes.len(), 1);
        let change = changes[0];
        let block = change.after.unwrap();
        assert!(d.problem.can_work(change.machine, block, change.key));
    }
}

#[test]
fn cross_exchange_exchanges_between_two_slots() {
    // ARRANGE
    let d = init_test_data();
    let original = default_schedule(&d);

    // ACT
    let neighbors = apply_many(&d, &CrossExchange, &LockedAssignments::none(), 1);

    // ASSERT
    assert!(!neighbors.is_empty());
    for neighbor in neighbors {
        let changes = original.diff(&neighbor);
        assert_eq!(changes.len(), 2);
        assert_eq!(
            original.number_of_assignments(),
            neighbor.number_of_assignments()
        );
    }
}

#[test]
fn mobilisation_shake_lets_machines_stay() {
    // ARRANGE
    let d = init_test_data();
    let original = default_schedule(&d);

    // ACT
    let neighbors = apply_many(&d, &MobilisationShake, &LockedAssignments::none(), 1);

    // ASSERT
    assert!(!neighbors.is_empty());
    for neighbor in neighbors {
        assert_eq!(
            original.number_of_assignments(),
            neighbor.number_of_assignments()
        );
        let changes = original.diff(&neighbor);
        assert_eq!(changes.len(), 1);
        for change in changes {
            assert!(change.before.is_some() && change.after.is_some());
            assert_eq!(
                neighbor.previous_block(change.machine, change.key),
                change.after
            );
        }
    }
}

#[test]
fn operators_never_touch_locked_slots() {
    // ARRANGE
    let d = init_test_data();
    let locks = lock_everything(&d);
    let operators: Vec<Box<dyn Operator>> = vec![
        Box::new(Swap),
        Box::new(MoveAssignment),
        Box::new(CrossExchange),
        Box::new(MobilisationShake),
    ];

    for operator in operators {
        // ACT
        let neighbors = apply_many(&d, operator.as_ref(), &locks, 3);

        // ASSERT
        for neighbor in neighbors {
            assert!(locks.is_respected_by(&neighbor), "{}", operator.name());
        }
    }
}

#[test]
fn selection_only_picks_enabled_operators() {
    // ARRANGE
    let registry = OperatorRegistry::with_defaults();

    for seed in 0..50 {
        // ACT
        let mut rng = StdRng::seed_from_u64(seed);
        let name = registry.select(&mut rng).unwrap().name();

        // ASSERT
        assert!(name == "swap" || name == "move", "{}", name);
    }
}

#[test]
fn all_weights_zero_selects_nothing() {
    // ARRANGE
    let mut registry = OperatorRegistry::with_defaults();
    registry.set_weight("swap", 0.0).unwrap();
    registry.set_weight("move", 0.0).unwrap();

    // ACT
    let selected = registry.select(&mut StdRng::seed_from_u64(1));

    // ASSERT
    assert!(selected.is_none());
    assert_eq!(registry.enabled().count(), 0);
}

#[test]
fn reweighting_validates_names_and_values() {
    // ARRANGE
    let mut registry = OperatorRegistry::with_defaults();

    // ACT & ASSERT
    assert_eq!(
        registry.set_weight("teleport", 1.0),
        Err(SolverError::UnknownOperator(String::from("teleport")))
    );
    assert!(matches!(
        registry.set_weight("swap", f64::NAN),
        Err(SolverError::InvalidWeight { .. })
    ));
    assert!(registry.set_weight("block_insertion", 2.5).is_ok());
    assert_eq!(registry.weight("block_insertion"), Some(2.5));
    assert_eq!(registry.weight("teleport"), None);
}

#[test]
fn config_weights_override_preset() {
    // ARRANGE
    let mut weights = std::collections::BTreeMap::new();
    weights.insert(String::from("swap"), serde_json::json!(3.0));
    let config = SolverConfig {
        preset: Some(String::from("stabilise")),
        operator_weights: OperatorWeights::Map(weights),
        ..SolverConfig::default()
    };

    // ACT
    let registry = OperatorRegistry::from_config(&config).unwrap();

    // ASSERT
    assert_eq!(registry.weight("swap"), Some(3.0));
    assert_eq!(registry.weight("move"), Some(1.5));
    assert_eq!(registry.weight("cross_exchange"), Some(0.0));
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec![
            "swap",
            "move",
            "block_insertion",
            "cross_exchange",
            "mobilisation_shake"
        ]
    );
}

#[test]
fn every_preset_is_known_to_the_registry() {
    for preset in presets::PRESETS {
        // ARRANGE
        let mut registry = OperatorRegistry::with_defaults();

        // ACT
        let result = registry.apply_preset(preset);

        // ASSERT
        assert!(result.is_ok(), "{}", preset.name);
        assert!(registry.enabled().count() > 0, "{}", preset.name);
    }
}
