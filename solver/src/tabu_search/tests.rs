use std::sync::Arc;

use model::test_utilities::init_test_data;
use solution::SlotChange;

use super::{TabuList, TabuSearch};
use crate::config::SolverConfig;
use crate::setup::RunHooks;
use crate::telemetry::BufferedTelemetry;
use crate::test_utilities::{config, lock, setup, setup_with_hooks, slow_start_setup};
use crate::Solver;

#[test]
fn reverse_moves_are_tabu_for_tenure_moves() {
    // ARRANGE
    let d = init_test_data();
    let mut tabu_list = TabuList::new(2);
    let change = |before, after| SlotChange {
        machine: d.f1,
        key: d.key(1, 0),
        before,
        after,
    };
    let other = SlotChange {
        machine: d.s1,
        key: d.key(2, 0),
        before: None,
        after: Some(d.b1),
    };

    // ACT
    tabu_list.record(&[change(Some(d.b1), Some(d.b2))]);

    // ASSERT
    assert!(tabu_list.is_tabu(&[change(Some(d.b2), Some(d.b1))]));
    assert!(!tabu_list.is_tabu(&[change(Some(d.b2), None)]));
    assert!(!tabu_list.is_tabu(&[other]));

    // two more moves push the first one out
    tabu_list.record(&[other]);
    tabu_list.record(&[other]);
    assert_eq!(tabu_list.len(), 2);
    assert!(!tabu_list.is_tabu(&[change(Some(d.b2), Some(d.b1))]));

    tabu_list.clear();
    assert!(tabu_list.is_empty());
}

#[test]
fn zero_tenure_forbids_nothing() {
    // ARRANGE
    let d = init_test_data();
    let mut tabu_list = TabuList::new(0);
    let change = SlotChange {
        machine: d.p1,
        key: d.key(2, 0),
        before: Some(d.b3),
        after: None,
    };

    // ACT
    tabu_list.record(&[change]);

    // ASSERT
    assert!(tabu_list.is_empty());
}

#[test]
fn zero_iterations_return_the_greedy_solution() {
    // ARRANGE
    let d = init_test_data();
    let solver = TabuSearch::initialize(setup(&d, config(0, 6)));

    // ACT
    let outcome = solver.solve();

    // ASSERT
    assert_eq!(outcome.best.objective_value().total(), 90.0);
    assert_eq!(outcome.run_id, "tabu-6");
}

#[test]
fn search_moves_and_keeps_best() {
    // ARRANGE
    let d = init_test_data();
    let solver = TabuSearch::initialize(setup(
        &d,
        SolverConfig {
            restart_interval: 10,
            tabu_candidates: 5,
            ..config(60, 9)
        },
    ));

    // ACT
    let outcome = solver.solve();

    // ASSERT
    assert_eq!(outcome.iterations, 60);
    assert_eq!(outcome.best.objective_value().total(), 90.0);
    assert!(outcome.accepted <= 60);
    // the start is optimal, so every 10 iterations without a new best trigger a restart
    assert_eq!(outcome.restarts, 6);
}

#[test]
fn workers_do_not_change_the_trajectory() {
    // ARRANGE
    let d = init_test_data();
    let sequential = SolverConfig {
        snapshot_interval: 1,
        ..config(40, 13)
    };
    let parallel = SolverConfig {
        workers: Some(4),
        ..sequential.clone()
    };
    let first_telemetry = Arc::new(BufferedTelemetry::new());
    let second_telemetry = Arc::new(BufferedTelemetry::new());

    // ACT
    TabuSearch::initialize(setup_with_hooks(
        &d,
        sequential,
        RunHooks::with_telemetry(first_telemetry.clone()),
    ))
    .solve();
    TabuSearch::initialize(setup_with_hooks(
        &d,
        parallel,
        RunHooks::with_telemetry(second_telemetry.clone()),
    ))
    .solve();

    // ASSERT
    assert_eq!(first_telemetry.events(), second_telemetry.events());
}

#[test]
fn locked_slots_survive_the_search() {
    // ARRANGE
    let d = init_test_data();
    let solver = TabuSearch::initialize(setup(
        &d,
        SolverConfig {
            preset: Some(String::from("explore")),
            locked_assignments: vec![lock("S1", "B1", 1, Some("am"))],
            ..config(40, 17)
        },
    ));

    // ACT
    let outcome = solver.solve();

    // ASSERT
    assert_eq!(
        outcome.best.solution().get_schedule().assignment(d.s1, d.key(1, 0)),
        Some(d.b1)
    );
}

#[test]
fn tabu_search_improves_a_poor_warm_start() {
    // ARRANGE
    let setup = slow_start_setup(config(30, 3));
    let initial = setup.initial_solution().objective_value().total();

    // ACT
    let outcome = TabuSearch::initialize(setup).solve();

    // ASSERT
    assert_eq!(initial, 60.0);
    assert!(outcome.best.objective_value().total() > initial);
    assert!(outcome.accepted > 0);
}
