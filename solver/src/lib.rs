pub mod cancellation;
pub mod config;
pub mod error;
pub mod greedy;
pub mod iterated_local_search;
pub mod locks;
pub mod multi_start;
pub mod objective;
pub mod operators;
mod planning_state;
pub mod presets;
pub mod repair;
pub mod result;
pub mod run;
pub mod setup;
pub mod simulated_annealing;
pub mod tabu_search;
pub mod telemetry;
pub mod watch;

#[cfg(test)]
mod test_utilities;

use std::sync::Arc;

use objective_framework::EvaluatedSolution;

pub use cancellation::CancellationToken;
pub use config::{Algorithm, SolverConfig};
pub use error::SolverError;
pub use multi_start::{MultiStart, MultiStartResult};
pub use result::{SolveOutcome, SolveResult};
pub use run::solve;
pub use setup::{RunHooks, SearchSetup};

pub type Solution = EvaluatedSolution<objective::ScheduleWithKpis>;

/// A search driver. All drivers start from the greedy construction of the setup and stop
/// after `iterations` iterations (or when the run is cancelled).
pub trait Solver {
    fn initialize(setup: Arc<SearchSetup>) -> Self;

    fn solve(&self) -> SolveOutcome;
}
