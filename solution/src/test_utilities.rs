use model::test_utilities::TestData;

use crate::Schedule;

/// Hand-made schedule on the test scenario of `model::test_utilities`:
///
/// | machine | day 1     | day 2     | day 3 |
/// |---------|-----------|-----------|-------|
/// | F1      | B1, B1    | B2, B2    | B2, - |
/// | S1      | B2, B2    | B1, B1    | B2, - |
/// | P1      | B2, -     | B3, B3    | B3, - |
///
/// P1 on B2 exceeds the capacity of landing L1 on day 1.
pub fn default_schedule(d: &TestData) -> Schedule {
    let mut schedule = Schedule::empty();
    let plan = [
        (d.f1, [Some(d.b1), Some(d.b1), Some(d.b2), Some(d.b2), Some(d.b2)]),
        (d.s1, [Some(d.b2), Some(d.b2), Some(d.b1), Some(d.b1), Some(d.b2)]),
        (d.p1, [Some(d.b2), None, Some(d.b3), Some(d.b3), Some(d.b3)]),
    ];
    let keys = [d.key(1, 0), d.key(1, 1), d.key(2, 0), d.key(2, 1), d.key(3, 0)];
    for (machine, blocks) in plan {
        for (key, block) in keys.iter().zip(blocks) {
            if block.is_some() {
                schedule.set(machine, *key, block);
            }
        }
    }
    schedule.clear_dirty();
    schedule
}
