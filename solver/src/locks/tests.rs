use model::test_utilities::init_test_data;
use solution::Schedule;

use super::LockedAssignments;
use crate::error::SolverError;
use crate::test_utilities::{greedy_schedule, lock};

#[test]
fn lock_with_shift_covers_one_slot() {
    // ARRANGE
    let d = init_test_data();

    // ACT
    let locks =
        LockedAssignments::from_config(&d.problem, &[lock("P1", "B3", 2, Some("pm"))]).unwrap();

    // ASSERT
    assert_eq!(locks.len(), 1);
    assert!(locks.is_locked(d.p1, d.key(2, 1)));
    assert_eq!(locks.block(d.p1, d.key(2, 1)), Some(d.b3));
    assert!(!locks.is_locked(d.p1, d.key(2, 0)));
}

#[test]
fn lock_without_shift_covers_available_shifts_of_the_day() {
    // ARRANGE
    let d = init_test_data();

    // ACT
    let p1_locks = LockedAssignments::from_config(&d.problem, &[lock("P1", "B2", 1, None)]).unwrap();
    let f1_locks = LockedAssignments::from_config(&d.problem, &[lock("F1", "B1", 1, None)]).unwrap();

    // ASSERT
    // P1 is off on day 1 pm
    assert_eq!(p1_locks.len(), 1);
    assert!(p1_locks.is_locked(d.p1, d.key(1, 0)));
    assert_eq!(f1_locks.len(), 2);
}

#[test]
fn invalid_locks_are_rejected() {
    // ARRANGE
    let d = init_test_data();
    let cases = vec![
        vec![lock("X9", "B1", 1, None)],
        vec![lock("F1", "B9", 1, None)],
        vec![lock("F1", "B1", 0, None)],
        vec![lock("F1", "B1", 4, None)],
        vec![lock("F1", "B1", 1, Some("night"))],
        vec![lock("F1", "B1", 1, Some("am")), lock("F1", "B2", 1, None)],
    ];

    for entries in cases {
        // ACT
        let result = LockedAssignments::from_config(&d.problem, &entries);

        // ASSERT
        assert!(
            matches!(result, Err(SolverError::InvalidLock(_))),
            "{:?} should be rejected",
            entries
        );
    }
}

#[test]
fn repeated_identical_locks_are_fine() {
    // ARRANGE
    let d = init_test_data();
    let entries = [lock("F1", "B1", 1, Some("am")), lock("F1", "B1", 1, None)];

    // ACT
    let locks = LockedAssignments::from_config(&d.problem, &entries).unwrap();

    // ASSERT
    assert_eq!(locks.len(), 2);
}

#[test]
fn impose_writes_locks_into_schedule() {
    // ARRANGE
    let d = init_test_data();
    let locks = LockedAssignments::from_config(
        &d.problem,
        &[lock("P1", "B3", 3, Some("am")), lock("F1", "B1", 1, Some("am"))],
    )
    .unwrap();
    let mut schedule = greedy_schedule(&d);
    assert!(!locks.is_respected_by(&schedule));

    // ACT
    locks.impose(&mut schedule);

    // ASSERT
    assert!(locks.is_respected_by(&schedule));
    assert_eq!(schedule.assignment(d.p1, d.key(3, 0)), Some(d.b3));
    // F1 already worked on B1, only the new slot is dirty
    assert_eq!(schedule.number_of_dirty_slots(), 1);
    assert!(LockedAssignments::none().is_respected_by(&Schedule::empty()));
}
