use std::sync::Arc;

use model::test_utilities::init_test_data;
use solution::evaluation::evaluate;
use solution::Schedule;

use super::{RepairEngine, RepairStats};
use crate::locks::LockedAssignments;
use crate::test_utilities::{feller_locked_on_l2, greedy_schedule, lock};

fn engine(d: &model::test_utilities::TestData) -> RepairEngine {
    RepairEngine::new(d.problem.clone(), Arc::new(LockedAssignments::none()))
}

#[test]
fn full_repair_keeps_a_feasible_schedule() {
    // ARRANGE
    let d = init_test_data();
    let engine = engine(&d);
    let schedule = greedy_schedule(&d);

    // ACT
    let (repaired, stats) = engine.full(schedule.clone());

    // ASSERT
    assert!(repaired.same_assignments(&schedule));
    assert_eq!(
        stats,
        RepairStats {
            calls: 1,
            slots_visited: 18,
            slots_processed: 18,
            machines_touched: 0,
        }
    );
}

#[test]
fn full_repair_fills_an_empty_schedule_greedily() {
    // ARRANGE
    let d = init_test_data();
    let engine = engine(&d);

    // ACT
    let (repaired, stats) = engine.full(Schedule::empty());

    // ASSERT
    assert!(repaired.same_assignments(&greedy_schedule(&d)));
    assert_eq!(stats.machines_touched, 3);
}

#[test]
fn limited_repair_only_processes_dirty_and_broken_slots() {
    // ARRANGE
    let d = init_test_data();
    let engine = engine(&d);
    let mut schedule = greedy_schedule(&d);
    schedule.set(d.f1, d.key(1, 0), Some(d.b3)); // B3 opens on day 2

    // ACT
    let (repaired, stats) = engine.limited(schedule);

    // ASSERT
    assert!(repaired.same_assignments(&greedy_schedule(&d)));
    assert_eq!(repaired.number_of_dirty_slots(), 0);
    assert_eq!(stats.slots_processed, 1);
    assert_eq!(stats.machines_touched, 1);
}

#[test]
fn limited_repair_clears_slots_without_remaining_work() {
    // ARRANGE
    let d = init_test_data();
    let engine = engine(&d);
    let mut schedule = greedy_schedule(&d);
    schedule.set(d.f1, d.key(2, 1), Some(d.b2)); // B2 is completed in the morning

    // ACT
    let (repaired, _) = engine.limited(schedule);

    // ASSERT
    assert_eq!(repaired.assignment(d.f1, d.key(2, 1)), None);
    assert!(repaired.same_assignments(&greedy_schedule(&d)));
}

#[test]
fn repair_leaves_locked_slots_alone() {
    // ARRANGE
    let d = init_test_data();
    let locks =
        LockedAssignments::from_config(&d.problem, &[lock("P1", "B2", 1, Some("am"))]).unwrap();
    let engine = RepairEngine::new(d.problem.clone(), Arc::new(locks.clone()));
    let mut schedule = greedy_schedule(&d);
    locks.impose(&mut schedule);

    // ACT
    let (full, _) = engine.full(schedule.clone());
    let (limited, _) = engine.limited(schedule);

    // ASSERT
    assert_eq!(full.assignment(d.p1, d.key(1, 0)), Some(d.b2));
    assert_eq!(limited.assignment(d.p1, d.key(1, 0)), Some(d.b2));
    assert!(locks.is_respected_by(&full));
}

#[test]
fn statistics_accumulate_over_calls() {
    // ARRANGE
    let d = init_test_data();
    let engine = engine(&d);

    // ACT
    engine.full(greedy_schedule(&d));
    engine.limited(greedy_schedule(&d));

    // ASSERT
    let stats = engine.stats();
    assert_eq!(stats.calls, 2);
    assert_eq!(stats.slots_visited, 36);
    assert_eq!(stats.slots_processed, 18);
}

#[test]
fn later_locked_slot_keeps_its_landing_place() {
    // ARRANGE
    let d = init_test_data();
    let (problem, locks) = feller_locked_on_l2(&d);
    let engine = RepairEngine::new(problem.clone(), locks.clone());
    let mut schedule = Schedule::empty();
    locks.impose(&mut schedule);

    // ACT
    let (repaired, _) = engine.full(schedule);

    // ASSERT
    assert!(locks.is_respected_by(&repaired));
    assert_eq!(repaired.assignment(d.f1, d.key(2, 1)), Some(d.b3));
    // P1 would take B3 on day 2 am, before the lock is reached
    assert_eq!(repaired.assignment(d.p1, d.key(2, 0)), None);
    assert_eq!(evaluate(&problem, &repaired).landing_excess, 0);
}
