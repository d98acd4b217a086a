use std::sync::Arc;

use heuristic_framework::local_search::Neighborhood;
use model::test_utilities::init_test_data;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{perturb, IteratedLocalSearch, SampledNeighborhood};
use crate::config::{LocalImproverKind, OperatorWeights, SolverConfig};
use crate::objective::ScheduleWithKpis;
use crate::setup::RunHooks;
use crate::telemetry::BufferedTelemetry;
use crate::test_utilities::{
    config, greedy_schedule, lock, setup, setup_with_hooks, slow_start_setup,
};
use crate::Solver;

#[test]
fn sampled_neighborhood_is_reproducible() {
    // ARRANGE
    let d = init_test_data();
    let setup = setup(&d, config(0, 1));
    let start = ScheduleWithKpis::new(greedy_schedule(&d), &d.problem);
    let first = SampledNeighborhood::new(setup.clone(), 42, 5);
    let second = SampledNeighborhood::new(setup, 42, 5);

    // ACT
    let first_neighbors: Vec<ScheduleWithKpis> = first.neighbors_of(&start).collect();
    let second_neighbors: Vec<ScheduleWithKpis> = second.neighbors_of(&start).collect();

    // ASSERT
    assert!(first_neighbors.len() <= 5);
    assert_eq!(first_neighbors.len(), second_neighbors.len());
    for (a, b) in first_neighbors.iter().zip(second_neighbors.iter()) {
        assert!(a.get_schedule().same_assignments(b.get_schedule()));
        assert_eq!(a.get_schedule().number_of_dirty_slots(), 0);
    }
}

#[test]
fn zero_iterations_return_the_greedy_solution() {
    // ARRANGE
    let d = init_test_data();
    let solver = IteratedLocalSearch::initialize(setup(&d, config(0, 1)));

    // ACT
    let outcome = solver.solve();

    // ASSERT
    assert_eq!(outcome.best.objective_value().total(), 90.0);
    assert_eq!(outcome.iterations, 0);
    assert_eq!(outcome.run_id, "ils-1");
}

#[test]
fn incumbent_only_improves() {
    // ARRANGE
    let d = init_test_data();
    let telemetry = Arc::new(BufferedTelemetry::new());
    let solver = IteratedLocalSearch::initialize(setup_with_hooks(
        &d,
        SolverConfig {
            preset: Some(String::from("mobilisation")),
            snapshot_interval: 1,
            local_search_steps: 3,
            local_search_samples: 4,
            ..config(25, 8)
        },
        RunHooks::with_telemetry(telemetry.clone()),
    ));

    // ACT
    let outcome = solver.solve();

    // ASSERT
    assert_eq!(outcome.iterations, 25);
    assert_eq!(outcome.best.objective_value().total(), 90.0);
    assert_eq!(outcome.restarts, 0);
    let best: Vec<f64> = telemetry
        .events()
        .iter()
        .map(|e| e.progress().best_objective)
        .collect();
    assert!(best.iter().all(|&b| b == 90.0));
}

#[test]
fn batching_does_not_change_the_result() {
    // ARRANGE
    let d = init_test_data();
    let sequential = SolverConfig {
        local_search_steps: 2,
        local_search_samples: 3,
        ..config(20, 4)
    };
    let batched = SolverConfig {
        batch_size: Some(3),
        workers: Some(2),
        ..sequential.clone()
    };

    // ACT
    let first = IteratedLocalSearch::initialize(setup(&d, sequential)).solve();
    let second = IteratedLocalSearch::initialize(setup(&d, batched)).solve();

    // ASSERT
    assert_eq!(
        first.best.objective_value().total(),
        second.best.objective_value().total()
    );
    assert_eq!(first.proposals, second.proposals);
    assert_eq!(first.accepted, second.accepted);
}

#[test]
fn locked_slots_survive_perturbation() {
    // ARRANGE
    let d = init_test_data();
    let solver = IteratedLocalSearch::initialize(setup(
        &d,
        SolverConfig {
            preset: Some(String::from("explore")),
            locked_assignments: vec![lock("S1", "B2", 3, Some("pm"))],
            local_search_steps: 2,
            local_search_samples: 3,
            ..config(15, 2)
        },
    ));

    // ACT
    let outcome = solver.solve();

    // ASSERT
    assert_eq!(
        outcome.best.solution().get_schedule().assignment(d.s1, d.key(3, 1)),
        Some(d.b2)
    );
}

#[test]
fn local_search_improves_a_poor_warm_start() {
    for local_improver in [LocalImproverKind::TakeFirst, LocalImproverKind::Best] {
        // ARRANGE
        let setup = slow_start_setup(SolverConfig {
            local_improver,
            local_search_steps: 3,
            local_search_samples: 4,
            ..config(10, 3)
        });
        let initial = setup.initial_solution().objective_value().total();

        // ACT
        let outcome = IteratedLocalSearch::initialize(setup).solve();

        // ASSERT
        assert_eq!(initial, 60.0);
        assert!(outcome.best.objective_value().total() > initial);
        assert!(outcome.accepted > 0);
    }
}

#[test]
fn perturbation_applies_single_changes() {
    // ARRANGE
    let d = init_test_data();
    let setup = setup(
        &d,
        SolverConfig {
            operator_weights: OperatorWeights::List(
                ["swap=0", "move=0", "block_insertion=0", "cross_exchange=0", "mobilisation_shake=1"]
                    .iter()
                    .map(|w| w.to_string())
                    .collect(),
            ),
            perturbation_strength: Some(3),
            ..config(0, 1)
        },
    );
    let start = greedy_schedule(&d);
    let mut expected = start.clone();
    let mut expected_rng = StdRng::seed_from_u64(8);
    for _ in 0..3 {
        if let Some((_, schedule)) = setup.propose(&expected, &mut expected_rng, 1) {
            expected = schedule;
        }
    }

    // ACT
    let (operators, perturbed) = perturb(&setup, &start, &mut StdRng::seed_from_u64(8), 3);

    // ASSERT
    assert!(operators.len() <= 3);
    assert!(operators.iter().all(|&o| o == "mobilisation_shake"));
    assert!(perturbed.same_assignments(&expected));
}
