use std::collections::BTreeMap;

use serde::Serialize;

use solution::evaluation::ViolationCounts;
use solution::json_serialisation::{assignment_rows, AssignmentRow};
use solution::{Schedule, ScheduleKpis};

use crate::operators::OperatorStatsTable;
use crate::repair::RepairStats;
use crate::setup::SearchSetup;
use crate::Solution;

/// What a search driver hands back: the best solution and the counters of the run.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub best: Solution,
    pub solver: &'static str,
    pub run_id: String,
    pub iterations: usize,
    pub proposals: u64,
    pub accepted: u64,
    pub restarts: u64,
    pub operator_stats: OperatorStatsTable,
    /// the run was stopped by its cancellation token before the iteration budget was used.
    pub cancelled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultMeta {
    pub solver: String,
    pub seed: u64,
    pub preset: Option<String>,
    pub kpi_totals: BTreeMap<String, f64>,
    pub kpis: ScheduleKpis,
    pub violations: ViolationCounts,
    pub operator_stats: OperatorStatsTable,
    pub repair_stats: RepairStats,
    pub iterations: usize,
    pub proposals: u64,
    pub accepted: u64,
    pub restarts: u64,
    pub acceptance_rate: f64,
    pub cancelled: bool,
    pub telemetry_run_id: String,
}

/// Result record of one run: objective, exported assignment rows and metadata.
#[derive(Debug, Clone, Serialize)]
pub struct SolveResult {
    pub objective: f64,
    pub assignments: Vec<AssignmentRow>,
    pub meta: ResultMeta,
    #[serde(skip)]
    pub schedule: Schedule,
}

impl SolveResult {
    pub fn new(outcome: SolveOutcome, setup: &SearchSetup) -> SolveResult {
        let objective = setup.objective();
        let best = outcome.best.solution();
        let kpis = best.get_kpis().clone();

        let mut kpi_totals: BTreeMap<String, f64> = objective
            .indicator_names()
            .zip(outcome.best.objective_value().iter().copied())
            .collect();
        kpi_totals.insert(String::from("violations"), kpis.violations.total() as f64);

        let acceptance_rate = if outcome.proposals == 0 {
            0.0
        } else {
            outcome.accepted as f64 / outcome.proposals as f64
        };

        SolveResult {
            objective: outcome.best.total(),
            assignments: assignment_rows(best.get_schedule(), setup.problem()),
            meta: ResultMeta {
                solver: outcome.solver.to_string(),
                seed: setup.config().seed,
                preset: setup.config().preset.clone(),
                kpi_totals,
                violations: kpis.violations,
                kpis,
                operator_stats: outcome.operator_stats,
                repair_stats: setup.repair_stats(),
                iterations: outcome.iterations,
                proposals: outcome.proposals,
                accepted: outcome.accepted,
                restarts: outcome.restarts,
                acceptance_rate,
                cancelled: outcome.cancelled,
                telemetry_run_id: outcome.run_id,
            },
            schedule: best.get_schedule().clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}
