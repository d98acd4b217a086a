
use serde::{Deserialize, Serialize};

use model::base_types::Day;
use model::OperationalProblem;

use crate::Schedule;

/// One exported assignment. `assigned` is always 1; empty slots are not exported.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AssignmentRow {
    pub machine_id: String,
    pub block_id: String,
    pub day: Day,
    pub shift_id: String,
    pub assigned: u8,
}

/// Rows ordered by (day, shift, machine).
pub fn assignment_rows(schedule: &Schedule, problem: &OperationalProblem) -> Vec<AssignmentRow> {
    schedule
        .chronological()
        .into_iter()
        .map(|(key, machine, block)| AssignmentRow {
            machine_id: problem.machine_id(machine).to_string(),
            block_id: problem.block_id(block).to_string(),
            day: key.day,
            shift_id: problem.problem().shift_id(key.shift).to_string(),
            assigned: 1,
        })
        .collect()
}

pub fn schedule_to_json(schedule: &Schedule, problem: &OperationalProblem) -> serde_json::Value {
    serde_json::json!(assignment_rows(schedule, problem))
}

/// Rebuilds a schedule from exported rows (e.g. a warm start). Rows with unknown ids or days
/// outside the horizon are rejected.
pub fn schedule_from_rows(
    rows: &[AssignmentRow],
    problem: &OperationalProblem,
) -> Result<Schedule, String> {
    let p = problem.problem();
    let mut schedule = Schedule::empty();
    for row in rows.iter().filter(|r| r.assigned > 0) {
        let machine = p
            .machine_by_id(&row.machine_id)
            .ok_or_else(|| format!("unknown machine '{}'", row.machine_id))?;
        let block = p
            .block_by_id(&row.block_id)
            .ok_or_else(|| format!("unknown block '{}'", row.block_id))?;
        let shift = p
            .shift_by_id(&row.shift_id)
            .ok_or_else(|| format!("unknown shift '{}'", row.shift_id))?;
        if row.day == 0 || row.day > p.num_days {
            return Err(format!(
                "day {} is outside of the horizon 1..={}",
                row.day, p.num_days
            ));
        }
        schedule.set(
            machine,
            model::base_types::ShiftKey::new(row.day, shift),
            Some(block),
        );
    }
    schedule.clear_dirty();
    Ok(schedule)
}
