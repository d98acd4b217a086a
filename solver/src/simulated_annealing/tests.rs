use std::sync::Arc;

use model::test_utilities::init_test_data;

use super::{accepts, initial_temperature, temperature, SimulatedAnnealing};
use crate::cancellation::CancellationToken;
use crate::config::SolverConfig;
use crate::setup::RunHooks;
use crate::telemetry::{BufferedTelemetry, TelemetryEvent};
use crate::test_utilities::{
    config, greedy_schedule, lock, setup, setup_with_hooks, slow_start_setup,
};
use crate::{SolveOutcome, Solver};

fn run_recorded(config: SolverConfig) -> (SolveOutcome, Vec<TelemetryEvent>) {
    let d = init_test_data();
    let telemetry = Arc::new(BufferedTelemetry::new());
    let setup = setup_with_hooks(&d, config, RunHooks::with_telemetry(telemetry.clone()));
    let outcome = SimulatedAnnealing::initialize(setup).solve();
    (outcome, telemetry.events())
}

#[test]
fn metropolis_criterion() {
    assert!(accepts(0.0, 1.0, 0.999));
    assert!(accepts(2.5, 0.0, 0.999));
    // exp(-1) = 0.3679
    assert!(accepts(-1.0, 1.0, 0.3));
    assert!(!accepts(-1.0, 1.0, 0.5));
    assert!(!accepts(-1.0, 0.0, 0.0));
}

#[test]
fn geometric_cooling() {
    assert_eq!(initial_temperature(90.0), 9.0);
    assert_eq!(initial_temperature(4.0), 1.0);
    assert_eq!(initial_temperature(-500.0), 50.0);
    assert_eq!(temperature(10.0, 0), 10.0);
    assert!((temperature(10.0, 1) - 9.95).abs() < 1e-12);
    assert!(temperature(10.0, 1000) < 0.1);
}

#[test]
fn zero_iterations_return_the_greedy_solution() {
    // ARRANGE
    let d = init_test_data();
    let solver = SimulatedAnnealing::initialize(setup(&d, config(0, 1)));

    // ACT
    let outcome = solver.solve();

    // ASSERT
    assert_eq!(outcome.best.objective_value().total(), 90.0);
    assert!(outcome
        .best
        .solution()
        .get_schedule()
        .same_assignments(&greedy_schedule(&d)));
    assert_eq!(outcome.iterations, 0);
    assert_eq!(outcome.proposals, 0);
    assert_eq!(outcome.run_id, "sa-1");
}

#[test]
fn best_never_falls_behind_start() {
    // ARRANGE
    let d = init_test_data();
    let solver = SimulatedAnnealing::initialize(setup(
        &d,
        SolverConfig {
            preset: Some(String::from("explore")),
            ..config(300, 11)
        },
    ));

    // ACT
    let outcome = solver.solve();

    // ASSERT
    assert_eq!(outcome.iterations, 300);
    assert_eq!(outcome.best.objective_value().total(), 90.0);
    assert!(outcome.proposals > 0);
    assert!(outcome.accepted <= outcome.proposals);
    let proposals: u64 = outcome.operator_stats.values().map(|s| s.proposals).sum();
    assert_eq!(proposals, outcome.proposals);
}

#[test]
fn batching_does_not_change_the_trajectory() {
    // ARRANGE
    let sequential = SolverConfig {
        snapshot_interval: 1,
        restart_interval: 15,
        operator_weights: crate::config::OperatorWeights::List(vec![
            String::from("block_insertion=1"),
            String::from("cross_exchange=1"),
        ]),
        ..config(150, 5)
    };
    let batched = SolverConfig {
        batch_size: Some(6),
        workers: Some(3),
        ..sequential.clone()
    };

    // ACT
    let (sequential_outcome, sequential_events) = run_recorded(sequential);
    let (batched_outcome, batched_events) = run_recorded(batched);

    // ASSERT
    assert_eq!(
        sequential_outcome.best.objective_value().total(),
        batched_outcome.best.objective_value().total()
    );
    assert!(sequential_outcome
        .best
        .solution()
        .get_schedule()
        .same_assignments(batched_outcome.best.solution().get_schedule()));
    assert_eq!(sequential_outcome.accepted, batched_outcome.accepted);
    assert_eq!(sequential_outcome.restarts, batched_outcome.restarts);
    assert_eq!(sequential_events, batched_events);
    assert_eq!(sequential_events.len(), 152);
}

#[test]
fn same_seed_same_run() {
    // ACT
    let (first, first_events) = run_recorded(config(80, 3));
    let (second, second_events) = run_recorded(config(80, 3));

    // ASSERT
    assert_eq!(first.accepted, second.accepted);
    assert_eq!(first_events, second_events);
}

#[test]
fn locked_slots_survive_the_search() {
    // ARRANGE
    let d = init_test_data();
    let solver = SimulatedAnnealing::initialize(setup(
        &d,
        SolverConfig {
            preset: Some(String::from("explore")),
            locked_assignments: vec![
                lock("P1", "B3", 3, Some("am")),
                lock("F1", "B2", 2, None),
            ],
            ..config(200, 21)
        },
    ));

    // ACT
    let outcome = solver.solve();

    // ASSERT
    let schedule = outcome.best.solution().get_schedule();
    assert_eq!(schedule.assignment(d.p1, d.key(3, 0)), Some(d.b3));
    assert_eq!(schedule.assignment(d.f1, d.key(2, 0)), Some(d.b2));
    assert_eq!(schedule.assignment(d.f1, d.key(2, 1)), Some(d.b2));
}

#[test]
fn cancelled_run_stops_before_the_first_iteration() {
    // ARRANGE
    let d = init_test_data();
    let token = CancellationToken::new();
    token.cancel();
    let hooks = RunHooks {
        cancellation: Some(token),
        ..RunHooks::default()
    };
    let solver = SimulatedAnnealing::initialize(setup_with_hooks(&d, config(500, 1), hooks));

    // ACT
    let outcome = solver.solve();

    // ASSERT
    assert!(outcome.cancelled);
    assert_eq!(outcome.iterations, 0);
    assert_eq!(outcome.best.objective_value().total(), 90.0);
}

#[test]
fn annealing_improves_a_poor_warm_start() {
    // ARRANGE
    let setup = slow_start_setup(config(100, 3));
    let initial = setup.initial_solution().objective_value().total();

    // ACT
    let outcome = SimulatedAnnealing::initialize(setup).solve();

    // ASSERT
    assert_eq!(initial, 60.0);
    assert!(outcome.best.objective_value().total() > initial);
    assert!(outcome.accepted > 0);
}
